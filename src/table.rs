//! The trip table: a [`DataSet`] of trip records plus its schema-capability flag.

use serde::Serialize;

use crate::error::{BikeshareError, BikeshareResult};
use crate::types::{DataSet, DataType, Field, Schema};

/// Column names used by the trip data files and by the derived time fields.
pub mod columns {
    pub const START_TIME: &str = "Start Time";
    pub const END_TIME: &str = "End Time";
    pub const TRIP_DURATION: &str = "Trip Duration";
    pub const START_STATION: &str = "Start Station";
    pub const END_STATION: &str = "End Station";
    pub const USER_TYPE: &str = "User Type";
    pub const GENDER: &str = "Gender";
    pub const BIRTH_YEAR: &str = "Birth Year";

    // Added by the time enricher.
    pub const MONTH: &str = "month";
    pub const DAY_OF_WEEK: &str = "day_of_week";
    pub const START_HOUR: &str = "start_hour";
}

/// What optional column groups a table carries.
///
/// Decided once per source when the table is loaded, never by probing rows later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Capabilities {
    /// `Gender` and `Birth Year` are present (always as a pair).
    pub demographics: bool,
}

/// The schema every trip source is loaded with.
///
/// `Start Time` and `Trip Duration` are required; other cells may be empty.
pub fn trip_schema(capabilities: Capabilities) -> Schema {
    let mut fields = vec![
        Field::new(columns::START_TIME, DataType::Timestamp).required(),
        Field::new(columns::END_TIME, DataType::Timestamp),
        Field::new(columns::TRIP_DURATION, DataType::Float64).required(),
        Field::new(columns::START_STATION, DataType::Utf8),
        Field::new(columns::END_STATION, DataType::Utf8),
        Field::new(columns::USER_TYPE, DataType::Utf8),
    ];
    if capabilities.demographics {
        fields.push(Field::new(columns::GENDER, DataType::Utf8));
        fields.push(Field::new(columns::BIRTH_YEAR, DataType::Float64));
    }
    Schema::new(fields)
}

/// An immutable table of trip records.
#[derive(Debug, Clone, PartialEq)]
pub struct TripTable {
    data: DataSet,
    capabilities: Capabilities,
}

impl TripTable {
    /// Wrap a dataset, checking that it actually has the columns `capabilities` promises.
    pub fn new(data: DataSet, capabilities: Capabilities) -> BikeshareResult<Self> {
        if capabilities.demographics {
            for name in [columns::GENDER, columns::BIRTH_YEAR] {
                if !data.schema.contains(name) {
                    return Err(BikeshareError::SchemaMismatch {
                        message: format!(
                            "table is flagged with demographics but has no '{name}' column"
                        ),
                    });
                }
            }
        }
        Ok(Self { data, capabilities })
    }

    pub fn data(&self) -> &DataSet {
        &self.data
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn row_count(&self) -> usize {
        self.data.row_count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// A page of raw rows for display.
    pub fn preview(&self, offset: usize, len: usize) -> DataSet {
        self.data.slice(offset, len)
    }

    /// A new table with different rows but the same capabilities.
    pub(crate) fn with_data(&self, data: DataSet) -> Self {
        Self {
            data,
            capabilities: self.capabilities,
        }
    }

    /// Index of a column, or a schema mismatch naming the stage that needed it.
    pub(crate) fn column_index(&self, name: &str, needed_by: &str) -> BikeshareResult<usize> {
        self.data
            .schema
            .index_of(name)
            .ok_or_else(|| BikeshareError::SchemaMismatch {
                message: format!(
                    "{needed_by} needs column '{name}'. columns={:?}",
                    self.data.schema.field_names().collect::<Vec<_>>()
                ),
            })
    }
}
