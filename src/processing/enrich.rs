//! The time enricher: derives calendar buckets from each trip's start time.

use chrono::{Datelike, Timelike};

use crate::error::{BikeshareError, BikeshareResult};
use crate::table::{columns, TripTable};
use crate::types::{DataType, Field, Value};

/// Returns a new table with `month` (1-12), `day_of_week` (Monday = 0 ... Sunday = 6) and
/// `start_hour` (0-23) appended to every row.
///
/// The start time is used as-is: it is a naive local timestamp and no timezone conversion is
/// applied. Row count and order are unchanged.
///
/// Fails with [`BikeshareError::MalformedRecord`] if a row's start time is not a timestamp, and
/// with [`BikeshareError::SchemaMismatch`] if the table has no start time or was already
/// enriched.
pub fn enrich(table: &TripTable) -> BikeshareResult<TripTable> {
    let start_idx = table.column_index(columns::START_TIME, "time enrichment")?;
    if table.data().schema.contains(columns::MONTH) {
        return Err(BikeshareError::SchemaMismatch {
            message: "table already has derived time columns".to_string(),
        });
    }

    let derived = vec![
        Field::new(columns::MONTH, DataType::Int64).required(),
        Field::new(columns::DAY_OF_WEEK, DataType::Int64).required(),
        Field::new(columns::START_HOUR, DataType::Int64).required(),
    ];

    let data = table.data().try_extend_columns(derived, |row_idx, row| {
        let ts = row[start_idx]
            .as_timestamp()
            .ok_or_else(|| BikeshareError::MalformedRecord {
                row: row_idx + 2,
                column: columns::START_TIME.to_string(),
                raw: format!("{:?}", row[start_idx]),
                message: "start time is not a timestamp".to_string(),
            })?;
        Ok::<_, BikeshareError>(vec![
            Value::Int64(i64::from(ts.month())),
            Value::Int64(i64::from(ts.weekday().num_days_from_monday())),
            Value::Int64(i64::from(ts.hour())),
        ])
    })?;

    Ok(table.with_data(data))
}
