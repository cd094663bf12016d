use std::fs;
use std::sync::{Arc, Mutex};

use bikeshare_stats::ingestion::{
    load, load_from_reader, CitySource, CompositeObserver, FileObserver, LoadContext, LoadObserver,
    LoadOptions, LoadSeverity, LoadStats,
};
use bikeshare_stats::BikeshareError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(CitySource, LoadStats)>>,
    failures: Mutex<Vec<LoadSeverity>>,
    alerts: Mutex<Vec<LoadSeverity>>,
}

impl LoadObserver for RecordingObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        self.successes.lock().unwrap().push((ctx.source, stats));
    }

    fn on_failure(&self, _ctx: &LoadContext, severity: LoadSeverity, _error: &BikeshareError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &LoadContext, severity: LoadSeverity, _error: &BikeshareError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn options(dir: &str, obs: Arc<RecordingObserver>, alert_at_or_above: LoadSeverity) -> LoadOptions {
    let obs: Arc<dyn LoadObserver> = obs;
    LoadOptions {
        observer: Some(obs),
        alert_at_or_above,
        ..LoadOptions::with_data_dir(dir)
    }
}

#[test]
fn observer_sees_successful_loads_with_stats() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options("tests/fixtures", obs.clone(), LoadSeverity::Critical);

    load(CitySource::Chicago, &opts).unwrap();
    load(CitySource::Washington, &opts).unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(
        successes,
        vec![
            (CitySource::Chicago, LoadStats { rows: 3, demographics: true }),
            (CitySource::Washington, LoadStats { rows: 4, demographics: false }),
        ]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options("tests/fixtures/does_not_exist", obs.clone(), LoadSeverity::Critical);

    let _ = load(CitySource::Chicago, &opts).unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![LoadSeverity::Critical]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![LoadSeverity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_bad_data() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options("tests/fixtures/malformed", obs.clone(), LoadSeverity::Critical);

    let _ = load(CitySource::Chicago, &opts).unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![LoadSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn lower_alert_threshold_alerts_on_schema_mismatch() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options("tests/fixtures/missing_columns", obs.clone(), LoadSeverity::Error);

    let _ = load(CitySource::NewYorkCity, &opts).unwrap_err();

    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![LoadSeverity::Error]);
}

#[test]
fn composite_and_file_observers_fan_out() {
    let log = std::env::temp_dir().join(format!("bikeshare_load_{}.log", std::process::id()));
    let _ = fs::remove_file(&log);

    let recorder = Arc::new(RecordingObserver::default());
    let file: Arc<dyn LoadObserver> = Arc::new(FileObserver::new(&log));
    let composite = CompositeObserver::new(vec![recorder.clone() as Arc<dyn LoadObserver>, file]);
    let opts = LoadOptions {
        observer: Some(Arc::new(composite)),
        ..LoadOptions::default()
    };

    let csv = "Start Time,End Time,Trip Duration,Start Station,End Station,User Type\n\
               2017-01-02 08:00:00,,60,A,B,Subscriber\n";
    load_from_reader(CitySource::Washington, csv.as_bytes(), &opts).unwrap();
    let _ = load_from_reader(CitySource::Washington, "Start Time\n".as_bytes(), &opts).unwrap_err();

    assert_eq!(recorder.successes.lock().unwrap().len(), 1);
    assert_eq!(recorder.failures.lock().unwrap().clone(), vec![LoadSeverity::Error]);

    let text = fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("ok source=washington path=<reader> rows=1"));
    assert!(lines[1].contains("fail severity=Error source=washington"));
    let _ = fs::remove_file(&log);
}
