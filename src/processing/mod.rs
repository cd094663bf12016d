//! In-memory table transformations.
//!
//! The processing layer operates on tables produced by ingestion and never mutates its input:
//!
//! - [`enrich()`]: the time enricher (month / day-of-week / start-hour columns)
//! - [`filter_trips()`]: the month/day filter engine, on top of the generic [`filter()`]
//! - [`reduce()`], [`group_counts()`], [`mode()`]: the reductions the aggregator is built from
//!
//! ## Example: enrich -> filter -> reduce
//!
//! ```rust
//! use bikeshare_stats::calendar::{DaySelector, MonthSelector};
//! use bikeshare_stats::ingestion::{load_from_reader, CitySource, LoadOptions};
//! use bikeshare_stats::processing::{enrich, filter_trips, reduce, ReduceOp};
//! use bikeshare_stats::table::columns;
//! use bikeshare_stats::types::Value;
//!
//! let csv = "\
//! Start Time,End Time,Trip Duration,Start Station,End Station,User Type
//! 2017-01-02 08:00:00,2017-01-02 08:01:00,60,A,B,Subscriber
//! 2017-01-03 09:00:00,2017-01-03 09:02:00,120,A,C,Customer
//! 2017-03-06 10:00:00,2017-03-06 10:03:00,180,B,C,Subscriber
//! ";
//! let table = load_from_reader(CitySource::Washington, csv.as_bytes(), &LoadOptions::default())
//!     .unwrap();
//! let enriched = enrich(&table).unwrap();
//! let january = filter_trips(&enriched, MonthSelector::January, DaySelector::All).unwrap();
//!
//! let total = reduce(january.data(), columns::TRIP_DURATION, ReduceOp::Sum).unwrap();
//! assert_eq!(total, Value::Float64(180.0));
//! ```

pub mod enrich;
pub mod filter;
pub mod reduce;

pub use enrich::enrich;
pub use filter::{filter, filter_trips};
pub use reduce::{group_counts, mode, reduce, GroupCount, GroupKey, ReduceOp};
