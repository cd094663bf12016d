//! `bikeshare-stats` loads bike-share trip records for a city into an in-memory table and answers
//! descriptive-statistics queries over it, optionally narrowed to one month and/or one day of the
//! week.
//!
//! A query flows through four stages, each producing a new immutable table:
//!
//! 1. **Record store** ([`ingestion::load`]): reads one of the known [`ingestion::CitySource`]s
//!    into a [`table::TripTable`].
//! 2. **Time enricher** ([`processing::enrich`]): adds `month`, `day_of_week` (Monday = 0) and
//!    `start_hour` columns.
//! 3. **Filter engine** ([`processing::filter_trips`]): applies the [`calendar::MonthSelector`]
//!    and [`calendar::DaySelector`].
//! 4. **Aggregator** ([`stats::aggregate`]): busiest times, busiest stations, trip durations and
//!    rider statistics.
//!
//! [`pipeline::run_query`] wires the stages together.
//!
//! ## What you can load
//!
//! Each city is a CSV file with a header row and at least the columns `Start Time`, `End Time`,
//! `Trip Duration`, `Start Station`, `End Station` and `User Type`. Chicago and New York City
//! also carry `Gender` and `Birth Year`; Washington does not, and its tables are flagged
//! accordingly ([`table::Capabilities`]).
//!
//! ## Quick example
//!
//! ```no_run
//! use bikeshare_stats::ingestion::LoadOptions;
//! use bikeshare_stats::pipeline::{run_query, Query};
//!
//! # fn main() -> Result<(), bikeshare_stats::BikeshareError> {
//! let query = Query::parse("chicago", "june", "all")?;
//! let outcome = run_query(&query, &LoadOptions::with_data_dir("data"))?;
//! println!(
//!     "{} trips, busiest hour {}",
//!     outcome.report.trips, outcome.report.time.hour.hour
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: the city catalog, CSV loading and load observers
//! - [`types`]: schema + in-memory dataset types
//! - [`table`]: the trip table and its column names
//! - [`calendar`]: month/day names and the filter selectors
//! - [`processing`]: enrichment, filtering and reductions
//! - [`stats`]: the four statistic groups
//! - [`pipeline`]: single and batched queries
//! - [`error`]: the crate error type

pub mod calendar;
pub mod error;
pub mod ingestion;
pub mod pipeline;
pub mod processing;
pub mod stats;
pub mod table;
pub mod types;

pub use error::{BikeshareError, BikeshareResult};
