use thiserror::Error;

/// Convenience result type used across the crate.
pub type BikeshareResult<T> = Result<T, BikeshareError>;

/// Error type returned by loading, filtering and aggregation.
///
/// A single enum is shared by every pipeline stage so a query can be driven end-to-end with `?`.
#[derive(Debug, Error)]
pub enum BikeshareError {
    /// Underlying I/O error (e.g. data file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error (bad quoting, inconsistent record length, ...).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The requested data source is not one of the known cities.
    #[error("unknown data source '{key}' (expected one of: {expected})")]
    UnknownSource { key: String, expected: String },

    /// A month or day selector could not be parsed.
    #[error("invalid {kind} selector '{value}' (expected one of: {expected})")]
    InvalidSelector {
        kind: &'static str,
        value: String,
        expected: String,
    },

    /// The input does not have the columns a stage needs.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A timestamp or numeric field could not be coerced to its declared type.
    #[error("malformed record at row {row} column '{column}': {message} (raw='{raw}')")]
    MalformedRecord {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// An aggregation was requested over a table with no usable rows.
    #[error("insufficient data: cannot compute {statistic} over an empty table")]
    InsufficientData { statistic: &'static str },
}
