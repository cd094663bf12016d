use serde::Serialize;

use crate::error::BikeshareResult;
use crate::processing::GroupCount;
use crate::table::{columns, TripTable};

use super::mode_of;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationCount {
    pub station: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripCount {
    pub start_station: String,
    pub end_station: String,
    pub count: usize,
}

/// The most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub start: StationCount,
    pub end: StationCount,
    pub trip: TripCount,
}

/// Most used start station, end station and (start, end) combination.
pub fn station_stats(table: &TripTable) -> BikeshareResult<StationStats> {
    const STAT: &str = "station statistics";

    let start = mode_of(table, &[columns::START_STATION], STAT)?;
    let end = mode_of(table, &[columns::END_STATION], STAT)?;
    let trip = mode_of(table, &[columns::START_STATION, columns::END_STATION], STAT)?;

    Ok(StationStats {
        start: StationCount {
            station: key_at(&start, 0),
            count: start.count,
        },
        end: StationCount {
            station: key_at(&end, 0),
            count: end.count,
        },
        trip: TripCount {
            start_station: key_at(&trip, 0),
            end_station: key_at(&trip, 1),
            count: trip.count,
        },
    })
}

fn key_at(group: &GroupCount, i: usize) -> String {
    group.key.get(i).map(ToString::to_string).unwrap_or_default()
}
