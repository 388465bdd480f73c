//! Internal metrics collection.
//!
//! Counters live in-process and are logged as a snapshot after every refresh.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// A gauge metric: last value set wins.
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 10ms, 50ms, 100ms, 500ms, 1s, 5s, 30s, 60s
    buckets: [AtomicU64; 9],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 9] = [1, 10, 50, 100, 500, 1_000, 5_000, 30_000, 60_000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        let idx = Self::BUCKET_BOUNDS
            .iter()
            .position(|&bound| ms <= bound)
            .unwrap_or(Self::BUCKET_BOUNDS.len() - 1);
        self.buckets[idx].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns (upper bound ms, count) pairs.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for the warehouse reports.
#[derive(Debug, Default)]
pub struct Metrics {
    // Bulk load
    pub rows_loaded: Counter,
    pub tables_loaded: Counter,
    pub table_load_failures: Counter,
    pub warehouse_version: Gauge,

    // Reporting views
    pub refreshes: Counter,
    pub refresh_failures: Counter,
    pub report_cache_hits: Counter,
    pub report_cache_misses: Counter,
    pub customer_report_rows: Gauge,
    pub product_report_rows: Gauge,

    // Export
    pub files_exported: Counter,
    pub export_failures: Counter,

    // Latency histograms
    pub load_latency_ms: Histogram,
    pub report_latency_ms: Histogram,
    pub export_latency_ms: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            rows_loaded: self.rows_loaded.get(),
            tables_loaded: self.tables_loaded.get(),
            table_load_failures: self.table_load_failures.get(),
            warehouse_version: self.warehouse_version.get(),
            refreshes: self.refreshes.get(),
            refresh_failures: self.refresh_failures.get(),
            report_cache_hits: self.report_cache_hits.get(),
            report_cache_misses: self.report_cache_misses.get(),
            customer_report_rows: self.customer_report_rows.get(),
            product_report_rows: self.product_report_rows.get(),
            files_exported: self.files_exported.get(),
            export_failures: self.export_failures.get(),
            load_latency_mean_ms: self.load_latency_ms.mean(),
            report_latency_mean_ms: self.report_latency_ms.mean(),
            export_latency_mean_ms: self.export_latency_ms.mean(),
        }
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub rows_loaded: u64,
    pub tables_loaded: u64,
    pub table_load_failures: u64,
    pub warehouse_version: u64,
    pub refreshes: u64,
    pub refresh_failures: u64,
    pub report_cache_hits: u64,
    pub report_cache_misses: u64,
    pub customer_report_rows: u64,
    pub product_report_rows: u64,
    pub files_exported: u64,
    pub export_failures: u64,
    pub load_latency_mean_ms: f64,
    pub report_latency_mean_ms: f64,
    pub export_latency_mean_ms: f64,
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}

/// Log a snapshot of the global metrics at info level.
pub fn log_metrics_snapshot() {
    let s = metrics().snapshot();
    tracing::info!(
        rows_loaded = s.rows_loaded,
        table_load_failures = s.table_load_failures,
        warehouse_version = s.warehouse_version,
        refreshes = s.refreshes,
        refresh_failures = s.refresh_failures,
        cache_hits = s.report_cache_hits,
        cache_misses = s.report_cache_misses,
        customer_rows = s.customer_report_rows,
        product_rows = s.product_report_rows,
        files_exported = s.files_exported,
        load_mean_ms = s.load_latency_mean_ms,
        report_mean_ms = s.report_latency_mean_ms,
        "Metrics snapshot"
    );
}
