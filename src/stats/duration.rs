use serde::Serialize;

use crate::error::{BikeshareError, BikeshareResult};
use crate::processing::{reduce, ReduceOp};
use crate::table::{columns, TripTable};

use super::require_rows;

pub const SECONDS_PER_MINUTE: f64 = 60.0;
pub const MINUTES_PER_DAY: f64 = 1440.0;
pub const SECONDS_PER_DAY: f64 = SECONDS_PER_MINUTE * MINUTES_PER_DAY;

/// One duration expressed in three units. No rounding is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationAmount {
    pub seconds: f64,
    pub minutes: f64,
    pub days: f64,
}

impl DurationAmount {
    pub fn from_seconds(seconds: f64) -> Self {
        let minutes = seconds / SECONDS_PER_MINUTE;
        Self {
            seconds,
            minutes,
            days: minutes / MINUTES_PER_DAY,
        }
    }
}

/// Total and mean trip duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationStats {
    pub total: DurationAmount,
    pub mean: DurationAmount,
}

/// Sum and arithmetic mean of `Trip Duration`.
pub fn duration_stats(table: &TripTable) -> BikeshareResult<DurationStats> {
    const STAT: &str = "trip duration statistics";

    require_rows(table, STAT)?;
    table.column_index(columns::TRIP_DURATION, STAT)?;

    let sum = reduce(table.data(), columns::TRIP_DURATION, ReduceOp::Sum).and_then(|v| v.as_f64());
    let mean =
        reduce(table.data(), columns::TRIP_DURATION, ReduceOp::Mean).and_then(|v| v.as_f64());

    match (sum, mean) {
        (Some(sum), Some(mean)) => Ok(DurationStats {
            total: DurationAmount::from_seconds(sum),
            mean: DurationAmount::from_seconds(mean),
        }),
        _ => Err(BikeshareError::InsufficientData { statistic: STAT }),
    }
}
