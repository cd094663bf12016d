use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::error::BikeshareError;

use super::source::CitySource;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the load failed because of the data).
    Error,
    /// Critical error (I/O or other infrastructure failures).
    Critical,
}

/// Context about a load attempt.
#[derive(Debug, Clone)]
pub struct LoadContext {
    /// The city being loaded.
    pub source: CitySource,
    /// Where the records were read from (`None` for in-memory readers).
    pub path: Option<PathBuf>,
}

impl LoadContext {
    fn location(&self) -> String {
        match &self.path {
            Some(p) => p.display().to_string(),
            None => "<reader>".to_string(),
        }
    }
}

/// Stats reported on a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Number of loaded trip records.
    pub rows: usize,
    /// Whether the table carries the demographic columns.
    pub demographics: bool,
}

/// Observer interface for load outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait LoadObserver: Send + Sync {
    /// Called when a load succeeds.
    fn on_success(&self, _ctx: &LoadContext, _stats: LoadStats) {}

    /// Called when a load fails.
    fn on_failure(&self, _ctx: &LoadContext, _severity: LoadSeverity, _error: &BikeshareError) {}

    /// Called when a load failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &BikeshareError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn LoadObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn LoadObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl LoadObserver for CompositeObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &BikeshareError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &BikeshareError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Forwards load events to `tracing` (info on success, warn/error on failure).
#[derive(Debug, Default)]
pub struct TracingObserver;

impl LoadObserver for TracingObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        tracing::info!(
            source = %ctx.source,
            path = %ctx.location(),
            rows = stats.rows,
            demographics = stats.demographics,
            "trip records loaded"
        );
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &BikeshareError) {
        match severity {
            LoadSeverity::Info | LoadSeverity::Warning => tracing::warn!(
                source = %ctx.source,
                path = %ctx.location(),
                ?severity,
                %error,
                "trip record load failed"
            ),
            LoadSeverity::Error | LoadSeverity::Critical => tracing::error!(
                source = %ctx.source,
                path = %ctx.location(),
                ?severity,
                %error,
                "trip record load failed"
            ),
        }
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &BikeshareError) {
        tracing::error!(
            alert = true,
            source = %ctx.source,
            path = %ctx.location(),
            ?severity,
            %error,
            "trip record load alert"
        );
    }
}

/// Appends load events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl LoadObserver for FileObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        self.append_line(&format!(
            "{} ok source={} path={} rows={} demographics={}",
            Utc::now().to_rfc3339(),
            ctx.source,
            ctx.location(),
            stats.rows,
            stats.demographics
        ));
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &BikeshareError) {
        self.append_line(&format!(
            "{} fail severity={:?} source={} path={} err={}",
            Utc::now().to_rfc3339(),
            severity,
            ctx.source,
            ctx.location(),
            error
        ));
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &BikeshareError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} source={} path={} err={}",
            Utc::now().to_rfc3339(),
            severity,
            ctx.source,
            ctx.location(),
            error
        ));
    }
}
