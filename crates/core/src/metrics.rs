//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Conversions (attempts, duration)
//! - Queue (enqueued jobs, runs, current length)
//! - History (current size)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Conversion Metrics
// =============================================================================

/// Conversions total by result.
pub static CONVERSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("holliday_conversions_total", "Total file conversions"),
        &["result"], // "success", "failure"
    )
    .unwrap()
});

/// Conversion duration in seconds.
pub static CONVERSION_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "holliday_conversion_duration_seconds",
            "Duration of file conversions",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
    )
    .unwrap()
});

// =============================================================================
// Queue Metrics
// =============================================================================

/// Jobs enqueued total.
pub static JOBS_ENQUEUED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("holliday_jobs_enqueued_total", "Total jobs enqueued").unwrap()
});

/// Queue runs total by outcome.
pub static QUEUE_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("holliday_queue_runs_total", "Total queue run invocations"),
        &["outcome"], // "started", "already_running"
    )
    .unwrap()
});

/// Current number of jobs held by the queue.
pub static QUEUE_LENGTH: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "holliday_queue_length",
        "Current number of jobs in the queue",
    )
    .unwrap()
});

// =============================================================================
// History Metrics
// =============================================================================

/// Current number of retained history entries.
pub static HISTORY_SIZE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "holliday_history_size",
        "Current number of conversion history entries",
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Conversions
        Box::new(CONVERSIONS_TOTAL.clone()),
        Box::new(CONVERSION_DURATION.clone()),
        // Queue
        Box::new(JOBS_ENQUEUED.clone()),
        Box::new(QUEUE_RUNS.clone()),
        Box::new(QUEUE_LENGTH.clone()),
        // History
        Box::new(HISTORY_SIZE.clone()),
    ]
}
