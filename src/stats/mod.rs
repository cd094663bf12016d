//! The aggregator: four independent, read-only statistic groups over an enriched (and usually
//! filtered) [`TripTable`].
//!
//! Policies shared by every computation:
//!
//! - **Empty tables** fail with [`BikeshareError::InsufficientData`]; no computation returns a
//!   made-up zero result.
//! - **Modes** pick the highest count; equal counts go to the smallest key (numeric order for
//!   month/day/hour/birth year, lexicographic order for stations and station pairs).
//! - **Nulls** are ignored by modes and group counts.

mod duration;
mod station;
mod time;
mod user;

use serde::Serialize;

use crate::error::{BikeshareError, BikeshareResult};
use crate::processing::{group_counts, GroupCount};
use crate::table::TripTable;

pub use duration::{
    duration_stats, DurationAmount, DurationStats, MINUTES_PER_DAY, SECONDS_PER_DAY,
    SECONDS_PER_MINUTE,
};
pub use station::{station_stats, StationCount, StationStats, TripCount};
pub use time::{time_stats, DayMode, HourMode, MonthMode, TimeStats};
pub use user::{user_stats, BirthYearStats, CategoryCount, Demographics, UserStats};

/// All four statistic groups for one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripReport {
    /// Number of trips the statistics were computed over.
    pub trips: usize,
    pub time: TimeStats,
    pub stations: StationStats,
    pub durations: DurationStats,
    pub users: UserStats,
}

/// Compute every statistic group.
pub fn aggregate(table: &TripTable) -> BikeshareResult<TripReport> {
    Ok(TripReport {
        trips: table.row_count(),
        time: time_stats(table)?,
        stations: station_stats(table)?,
        durations: duration_stats(table)?,
        users: user_stats(table)?,
    })
}

fn require_rows(table: &TripTable, statistic: &'static str) -> BikeshareResult<()> {
    if table.is_empty() {
        Err(BikeshareError::InsufficientData { statistic })
    } else {
        Ok(())
    }
}

/// Group counts over existing columns, with the aggregator's error mapping.
fn counts_of(
    table: &TripTable,
    columns: &[&str],
    statistic: &'static str,
) -> BikeshareResult<Vec<GroupCount>> {
    for column in columns {
        table.column_index(column, statistic)?;
    }
    group_counts(table.data(), columns).ok_or_else(|| BikeshareError::SchemaMismatch {
        message: format!("{statistic} needs columns {columns:?}"),
    })
}

/// The mode of `columns`, or insufficient data when every row has a null key.
fn mode_of(
    table: &TripTable,
    columns: &[&str],
    statistic: &'static str,
) -> BikeshareResult<GroupCount> {
    require_rows(table, statistic)?;
    counts_of(table, columns, statistic)?
        .into_iter()
        .next()
        .ok_or(BikeshareError::InsufficientData { statistic })
}

/// The mode of an integer column (derived time fields, years).
fn int_mode_of(
    table: &TripTable,
    column: &str,
    statistic: &'static str,
) -> BikeshareResult<(i64, usize)> {
    let top = mode_of(table, &[column], statistic)?;
    match top.key.first().and_then(|k| k.as_int()) {
        Some(v) => Ok((v, top.count)),
        None => Err(BikeshareError::SchemaMismatch {
            message: format!("{statistic}: column '{column}' is not an integer column"),
        }),
    }
}
