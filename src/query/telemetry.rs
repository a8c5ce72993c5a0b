use parking_lot::RwLock;
use serde::Serialize;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::errors::MatchError;

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub slow_match_us: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        let slow = std::env::var("DOCMATCH_SLOW_MATCH_US")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1_000);
        Self { slow_match_us: slow }
    }
}

#[derive(Default)]
pub struct Metrics {
    pub matches_total: AtomicU64,
    pub matched_true_total: AtomicU64,
    pub matches_slow_total: AtomicU64,
    pub clauses_total: AtomicU64,
    pub unknown_operator_total: AtomicU64,
    pub type_mismatch_total: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub matches_total: u64,
    pub matched_true_total: u64,
    pub matches_slow_total: u64,
    pub clauses_total: u64,
    pub unknown_operator_total: u64,
    pub type_mismatch_total: u64,
}

#[derive(Default)]
pub struct Telemetry {
    pub cfg: RwLock<TelemetryConfig>,
    pub metrics: Metrics,
}

pub(crate) static TELEMETRY: LazyLock<Telemetry> = LazyLock::new(Telemetry::default);

pub fn set_slow_match_us(us: u64) {
    TELEMETRY.cfg.write().slow_match_us = us;
}

pub fn slow_match_us() -> u64 {
    TELEMETRY.cfg.read().slow_match_us
}

pub(crate) fn record_clause() {
    TELEMETRY.metrics.clauses_total.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_match(result: &Result<bool, MatchError>, elapsed: Duration) {
    let m = &TELEMETRY.metrics;
    m.matches_total.fetch_add(1, Ordering::Relaxed);
    match result {
        Ok(true) => {
            m.matched_true_total.fetch_add(1, Ordering::Relaxed);
        }
        Ok(false) => {}
        Err(MatchError::UnknownOperator(_)) => {
            m.unknown_operator_total.fetch_add(1, Ordering::Relaxed);
        }
        Err(MatchError::TypeMismatch { .. }) => {
            m.type_mismatch_total.fetch_add(1, Ordering::Relaxed);
        }
    }
    let us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
    if us >= slow_match_us() {
        m.matches_slow_total.fetch_add(1, Ordering::Relaxed);
        let line = serde_json::json!({
            "event": "slow_match",
            "elapsed_us": us,
            "threshold_us": slow_match_us(),
            "ok": result.is_ok(),
        });
        log::warn!(target: "docmatch::metrics", "{line}");
    }
}

#[must_use]
pub fn snapshot() -> MetricsSnapshot {
    let m = &TELEMETRY.metrics;
    MetricsSnapshot {
        matches_total: m.matches_total.load(Ordering::Relaxed),
        matched_true_total: m.matched_true_total.load(Ordering::Relaxed),
        matches_slow_total: m.matches_slow_total.load(Ordering::Relaxed),
        clauses_total: m.clauses_total.load(Ordering::Relaxed),
        unknown_operator_total: m.unknown_operator_total.load(Ordering::Relaxed),
        type_mismatch_total: m.type_mismatch_total.load(Ordering::Relaxed),
    }
}

#[must_use]
pub fn metrics_text() -> String {
    // OpenMetrics/Prometheus exposition format (no types/HELP for brevity)
    let s = snapshot();
    format!(
        "docmatch_matches_total {}\n\
         docmatch_matched_true_total {}\n\
         docmatch_matches_slow_total {}\n\
         docmatch_clauses_total {}\n\
         docmatch_unknown_operator_total {}\n\
         docmatch_type_mismatch_total {}\n",
        s.matches_total,
        s.matched_true_total,
        s.matches_slow_total,
        s.clauses_total,
        s.unknown_operator_total,
        s.type_mismatch_total,
    )
}

/// Emit the current counters as one JSON line on the `docmatch::metrics` target.
pub fn log_snapshot() {
    match serde_json::to_string(&snapshot()) {
        Ok(line) => log::info!(target: "docmatch::metrics", "{line}"),
        Err(e) => log::warn!(target: "docmatch::metrics", "metrics snapshot not serializable: {e}"),
    }
}
