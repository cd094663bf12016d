//! The record store: ingestion of per-city trip files.
//!
//! Most callers should use [`load`] (from [`source`]) which:
//!
//! - resolves a [`CitySource`] to its CSV file under [`LoadOptions::data_dir`]
//! - parses every row into a typed [`crate::table::TripTable`]
//! - optionally reports success/failure/alerts to a [`LoadObserver`]
//!
//! The generic CSV reader is available under [`csv`].

pub mod csv;
pub mod observability;
pub mod source;

pub use observability::{
    CompositeObserver, FileObserver, LoadContext, LoadObserver, LoadSeverity, LoadStats,
    TracingObserver,
};
pub use source::{has_all_sources, load, load_by_key, load_from_reader, CitySource, LoadOptions};
