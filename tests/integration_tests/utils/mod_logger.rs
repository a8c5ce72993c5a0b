use bson::doc;
use std::fs;
use tempfile::tempdir;

#[test]
fn configure_logging_writes_app_metrics_and_trace_in_dir() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("proc_logs");
    fs::create_dir_all(&base).unwrap();
    // A logger may already be installed by another test in this binary.
    if docmatch::logger::configure_logging_with_trace(Some(&base), Some("debug"), Some(3), true)
        .is_err()
    {
        return;
    }
    log::info!("hello app");
    docmatch::query::telemetry::log_snapshot();
    assert!(docmatch::matches(&doc! {"$equal": {"a": 1}}, &doc! {"a": 1}).unwrap());
    assert!(base.join("app.log").exists());
    assert!(base.join("metrics.log").exists());
    assert!(base.join("trace.log").exists());
}

#[test]
fn init_path_reports_missing_file() {
    let dir = tempdir().unwrap();
    assert!(docmatch::logger::init_path(&dir.path().join("missing.yaml")).is_err());
}
