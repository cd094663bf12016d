use serde::Serialize;

use crate::calendar::{day_name, month_name};
use crate::error::{BikeshareError, BikeshareResult};
use crate::table::{columns, TripTable};

use super::int_mode_of;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthMode {
    /// 1-based calendar month.
    pub month: u32,
    pub name: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayMode {
    /// Monday = 0 ... Sunday = 6.
    pub day_of_week: u32,
    pub name: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourMode {
    pub hour: u32,
    pub count: usize,
}

/// The most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeStats {
    pub month: MonthMode,
    pub day: DayMode,
    pub hour: HourMode,
}

/// Mode of month, day of week and start hour.
pub fn time_stats(table: &TripTable) -> BikeshareResult<TimeStats> {
    const STAT: &str = "time of travel statistics";

    let (month, month_count) = int_mode_of(table, columns::MONTH, STAT)?;
    let (day, day_count) = int_mode_of(table, columns::DAY_OF_WEEK, STAT)?;
    let (hour, hour_count) = int_mode_of(table, columns::START_HOUR, STAT)?;

    let month = derived_u32(month, columns::MONTH)?;
    let day = derived_u32(day, columns::DAY_OF_WEEK)?;

    Ok(TimeStats {
        month: MonthMode {
            month,
            name: month_name(month).ok_or_else(|| out_of_range(columns::MONTH, i64::from(month)))?,
            count: month_count,
        },
        day: DayMode {
            day_of_week: day,
            name: day_name(day).ok_or_else(|| out_of_range(columns::DAY_OF_WEEK, i64::from(day)))?,
            count: day_count,
        },
        hour: HourMode {
            hour: derived_u32(hour, columns::START_HOUR)?,
            count: hour_count,
        },
    })
}

fn derived_u32(value: i64, column: &str) -> BikeshareResult<u32> {
    u32::try_from(value).map_err(|_| out_of_range(column, value))
}

fn out_of_range(column: &str, value: i64) -> BikeshareError {
    BikeshareError::SchemaMismatch {
        message: format!("derived column '{column}' holds out-of-range value {value}"),
    }
}
