//! One query end to end: load -> enrich -> filter -> aggregate.
//!
//! Every query owns the tables it creates; nothing is shared or cached between queries, which is
//! what lets [`run_batch`] run independent queries on a rayon pool without locking.

use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Serialize, Serializer};

use crate::calendar::{DaySelector, MonthSelector};
use crate::error::BikeshareResult;
use crate::ingestion::{load, CitySource, LoadOptions};
use crate::processing::{enrich, filter_trips};
use crate::stats::{duration_stats, station_stats, time_stats, user_stats, TripReport};
use crate::table::TripTable;

/// A validated statistics request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Query {
    pub source: CitySource,
    pub month: MonthSelector,
    pub day: DaySelector,
}

impl Query {
    pub fn new(source: CitySource, month: MonthSelector, day: DaySelector) -> Self {
        Self { source, month, day }
    }

    /// Parse the three selectors from user text.
    pub fn parse(source: &str, month: &str, day: &str) -> BikeshareResult<Self> {
        Ok(Self {
            source: source.parse()?,
            month: month.parse()?,
            day: day.parse()?,
        })
    }
}

/// Wall-clock time spent in each stage of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Timings {
    #[serde(serialize_with = "as_secs")]
    pub prepare: Duration,
    #[serde(serialize_with = "as_secs")]
    pub time: Duration,
    #[serde(serialize_with = "as_secs")]
    pub stations: Duration,
    #[serde(serialize_with = "as_secs")]
    pub durations: Duration,
    #[serde(serialize_with = "as_secs")]
    pub users: Duration,
}

fn as_secs<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(d.as_secs_f64())
}

/// The result of one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutcome {
    pub query: Query,
    pub report: TripReport,
    pub timings: Timings,
}

/// Load, enrich and filter the trips a query selects.
///
/// An empty result is a valid table; it only becomes an error once aggregated.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(source = %query.source, month = %query.month, day = %query.day)
)]
pub fn prepare(query: &Query, options: &LoadOptions) -> BikeshareResult<TripTable> {
    let raw = load(query.source, options)?;
    tracing::debug!(rows = raw.row_count(), "loaded");
    let enriched = enrich(&raw)?;
    let filtered = filter_trips(&enriched, query.month, query.day)?;
    tracing::debug!(rows = filtered.row_count(), "filtered");
    Ok(filtered)
}

/// Run the four statistic groups over an already prepared table, timing each one.
pub fn summarize(table: &TripTable) -> BikeshareResult<(TripReport, Timings)> {
    let mut timings = Timings::default();
    let time = timed(&mut timings.time, || time_stats(table))?;
    let stations = timed(&mut timings.stations, || station_stats(table))?;
    let durations = timed(&mut timings.durations, || duration_stats(table))?;
    let users = timed(&mut timings.users, || user_stats(table))?;

    let report = TripReport {
        trips: table.row_count(),
        time,
        stations,
        durations,
        users,
    };
    Ok((report, timings))
}

/// Run a full query.
pub fn run_query(query: &Query, options: &LoadOptions) -> BikeshareResult<QueryOutcome> {
    let mut prepare_time = Duration::ZERO;
    let table = timed(&mut prepare_time, || prepare(query, options))?;
    let (report, mut timings) = summarize(&table)?;
    timings.prepare = prepare_time;

    tracing::info!(
        source = %query.source,
        month = %query.month,
        day = %query.day,
        trips = report.trips,
        elapsed_ms = prepare_time.as_millis() as u64,
        "query finished"
    );
    Ok(QueryOutcome {
        query: *query,
        report,
        timings,
    })
}

/// Run independent queries in parallel. Results come back in input order.
pub fn run_batch(queries: &[Query], options: &LoadOptions) -> Vec<BikeshareResult<QueryOutcome>> {
    queries
        .par_iter()
        .map(|query| run_query(query, options))
        .collect()
}

/// The same month/day selection against every city.
pub fn all_cities(month: MonthSelector, day: DaySelector) -> Vec<Query> {
    CitySource::ALL
        .into_iter()
        .map(|source| Query::new(source, month, day))
        .collect()
}

fn timed<T>(slot: &mut Duration, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    *slot = start.elapsed();
    out
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::{all_cities, Query};
    use crate::calendar::{DaySelector, MonthSelector};
    use crate::error::BikeshareError;
    use crate::ingestion::CitySource;

    #[test]
    fn parse_validates_every_selector() {
        let q = Query::parse("Washington", "march", "Friday").unwrap();
        assert_eq!(
            q,
            Query::new(CitySource::Washington, MonthSelector::March, DaySelector::Day(Weekday::Fri))
        );
        assert!(matches!(
            Query::parse("paris", "all", "all").unwrap_err(),
            BikeshareError::UnknownSource { .. }
        ));
        assert!(matches!(
            Query::parse("chicago", "august", "all").unwrap_err(),
            BikeshareError::InvalidSelector { kind: "month", .. }
        ));
    }

    #[test]
    fn all_cities_covers_each_source_once() {
        let queries = all_cities(MonthSelector::All, DaySelector::All);
        let sources: Vec<_> = queries.iter().map(|q| q.source).collect();
        assert_eq!(sources, CitySource::ALL.to_vec());
    }
}
