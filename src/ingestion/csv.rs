//! CSV ingestion implementation.

use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::{BikeshareError, BikeshareResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Accepted `Start Time` / `End Time` layouts, tried in order.
const TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Ingest a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all schema fields (order can differ, extra columns are ignored).
/// - Each value is parsed according to the schema field type.
/// - An empty cell in a required field is a malformed record.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> BikeshareResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr, schema)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> BikeshareResult<DataSet> {
    let headers = rdr.headers()?.clone();

    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h.trim() == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(BikeshareError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &csv_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let raw = record.get(csv_idx).unwrap_or("");
            row.push(parse_typed_value(user_row, field, raw)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

fn parse_typed_value(row: usize, field: &Field, raw: &str) -> BikeshareResult<Value> {
    let malformed = |message: String| BikeshareError::MalformedRecord {
        row,
        column: field.name.clone(),
        raw: raw.to_owned(),
        message,
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return if field.nullable {
            Ok(Value::Null)
        } else {
            Err(malformed("required value is empty".to_string()))
        };
    }

    match field.data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| malformed(e.to_string())),
        DataType::Float64 => match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Value::Float64(v)),
            Ok(_) => Err(malformed("expected a finite number".to_string())),
            Err(e) => Err(malformed(e.to_string())),
        },
        DataType::Timestamp => parse_timestamp(trimmed)
            .map(Value::Timestamp)
            .ok_or_else(|| malformed("expected timestamp like 2017-01-01 09:07:57".to_string())),
    }
}

/// Parse a naive timestamp in any of the accepted layouts.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}
