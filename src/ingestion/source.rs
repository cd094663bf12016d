//! The record store: the closed catalog of city data sources and the `load` entry points.
//!
//! - [`CitySource`] is the fixed set of known sources; parsing an unknown key fails with
//!   [`BikeshareError::UnknownSource`].
//! - [`load`] reads a city's CSV file from [`LoadOptions::data_dir`] into a [`TripTable`].
//! - If a [`LoadObserver`] is configured, success/failure/alerts are reported to it.
//!
//! Every call performs exactly one read of the backing file. Nothing is cached between calls;
//! a caching layer would sit in front of [`load`] if file reads ever became the bottleneck.

use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::{BikeshareError, BikeshareResult};
use crate::table::{columns, trip_schema, Capabilities, TripTable};
use crate::types::{DataSet, Schema};

use super::csv::{ingest_csv_from_path, ingest_csv_from_reader};
use super::observability::{LoadContext, LoadObserver, LoadSeverity, LoadStats};

/// The known trip data sources, one per city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CitySource {
    Chicago,
    NewYorkCity,
    Washington,
}

impl CitySource {
    /// Every source, in prompt order.
    pub const ALL: [CitySource; 3] = [
        CitySource::Chicago,
        CitySource::NewYorkCity,
        CitySource::Washington,
    ];

    /// The lookup key accepted by [`FromStr`].
    pub fn key(self) -> &'static str {
        match self {
            CitySource::Chicago => "chicago",
            CitySource::NewYorkCity => "new york city",
            CitySource::Washington => "washington",
        }
    }

    /// File name of the source inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            CitySource::Chicago => "chicago.csv",
            CitySource::NewYorkCity => "new_york_city.csv",
            CitySource::Washington => "washington.csv",
        }
    }

    /// Which optional column groups this source provides.
    ///
    /// Washington publishes no rider gender or birth year.
    pub fn capabilities(self) -> Capabilities {
        match self {
            CitySource::Chicago | CitySource::NewYorkCity => Capabilities { demographics: true },
            CitySource::Washington => Capabilities {
                demographics: false,
            },
        }
    }
}

impl FromStr for CitySource {
    type Err = BikeshareError;

    fn from_str(s: &str) -> BikeshareResult<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|src| src.key() == wanted)
            .ok_or_else(|| BikeshareError::UnknownSource {
                key: s.to_string(),
                expected: Self::ALL.map(|src| src.key()).join(", "),
            })
    }
}

impl fmt::Display for CitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for CitySource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

/// Options controlling how sources are located and how loads are reported.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// Directory holding the per-city CSV files.
    pub data_dir: PathBuf,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("data_dir", &self.data_dir)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

impl LoadOptions {
    /// Default options reading from `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Full path of a source's file.
    pub fn path_for(&self, source: CitySource) -> PathBuf {
        self.data_dir.join(source.file_name())
    }
}

/// Load every trip record of `source` into a [`TripTable`].
///
/// Fails with:
///
/// - [`BikeshareError::Io`] / [`BikeshareError::Csv`] if the file cannot be read
/// - [`BikeshareError::SchemaMismatch`] if a required column (including the demographic pair for
///   sources that declare it) is missing
/// - [`BikeshareError::MalformedRecord`] if any timestamp or number cannot be parsed, or a trip
///   duration is negative. No partial table is ever returned.
///
/// # Example
///
/// ```no_run
/// use bikeshare_stats::ingestion::{load, CitySource, LoadOptions};
///
/// # fn main() -> Result<(), bikeshare_stats::BikeshareError> {
/// let table = load(CitySource::Chicago, &LoadOptions::with_data_dir("data"))?;
/// println!("rows={}", table.row_count());
/// # Ok(())
/// # }
/// ```
pub fn load(source: CitySource, options: &LoadOptions) -> BikeshareResult<TripTable> {
    let path = options.path_for(source);
    let ctx = LoadContext {
        source,
        path: Some(path.clone()),
    };
    let result = load_impl(source, |schema| ingest_csv_from_path(&path, schema));
    report(options, &ctx, &result);
    result
}

/// Like [`load`], but reads the CSV text of `source` from an arbitrary reader.
pub fn load_from_reader<R: std::io::Read>(
    source: CitySource,
    reader: R,
    options: &LoadOptions,
) -> BikeshareResult<TripTable> {
    let ctx = LoadContext { source, path: None };
    let result = load_impl(source, |schema| {
        let mut rdr = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);
        ingest_csv_from_reader(&mut rdr, schema)
    });
    report(options, &ctx, &result);
    result
}

/// Resolve a source key (e.g. `"new york city"`) and load it.
pub fn load_by_key(key: &str, options: &LoadOptions) -> BikeshareResult<TripTable> {
    load(key.parse()?, options)
}

fn load_impl<F>(source: CitySource, ingest: F) -> BikeshareResult<TripTable>
where
    F: FnOnce(&Schema) -> BikeshareResult<DataSet>,
{
    let capabilities = source.capabilities();
    let data = ingest(&trip_schema(capabilities))?;
    check_durations(&data)?;
    TripTable::new(data, capabilities)
}

/// Trip durations are seconds and can never be negative.
fn check_durations(data: &DataSet) -> BikeshareResult<()> {
    let Some(idx) = data.schema.index_of(columns::TRIP_DURATION) else {
        return Ok(());
    };
    for (row_idx0, row) in data.rows.iter().enumerate() {
        if let Some(v) = row[idx].as_f64() {
            if v < 0.0 {
                return Err(BikeshareError::MalformedRecord {
                    row: row_idx0 + 2,
                    column: columns::TRIP_DURATION.to_string(),
                    raw: v.to_string(),
                    message: "trip duration must not be negative".to_string(),
                });
            }
        }
    }
    Ok(())
}

fn report(options: &LoadOptions, ctx: &LoadContext, result: &BikeshareResult<TripTable>) {
    let Some(obs) = options.observer.as_ref() else {
        return;
    };
    match result {
        Ok(table) => obs.on_success(
            ctx,
            LoadStats {
                rows: table.row_count(),
                demographics: table.capabilities().demographics,
            },
        ),
        Err(e) => {
            let sev = severity_for_error(e);
            obs.on_failure(ctx, sev, e);
            if sev >= options.alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }
}

fn severity_for_error(e: &BikeshareError) -> LoadSeverity {
    match e {
        BikeshareError::Io(_) => LoadSeverity::Critical,
        BikeshareError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => LoadSeverity::Critical,
            _ if error_chain_contains_io(err) => LoadSeverity::Critical,
            _ => LoadSeverity::Error,
        },
        BikeshareError::UnknownSource { .. }
        | BikeshareError::InvalidSelector { .. }
        | BikeshareError::SchemaMismatch { .. }
        | BikeshareError::MalformedRecord { .. }
        | BikeshareError::InsufficientData { .. } => LoadSeverity::Error,
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

/// True if `path` looks like a directory containing every city file.
pub fn has_all_sources(data_dir: &Path) -> bool {
    CitySource::ALL
        .iter()
        .all(|src| data_dir.join(src.file_name()).is_file())
}
