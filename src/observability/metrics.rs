//! Metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for one or more tables.
///
/// Uses Relaxed ordering; counters are independent and only read for reporting.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    requests_decoded: AtomicU64,
    columns_dropped: AtomicU64,
    sorts_dropped: AtomicU64,
    regex_downgrades: AtomicU64,
    queries_executed: AtomicU64,
    queries_failed: AtomicU64,
    rows_returned: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment decoded request count
    pub fn increment_requests(&self) {
        self.requests_decoded.fetch_add(1, Ordering::Relaxed);
    }

    /// Add dropped column blocks
    pub fn add_columns_dropped(&self, count: u64) {
        self.columns_dropped.fetch_add(count, Ordering::Relaxed);
    }

    /// Add dropped sort slots
    pub fn add_sorts_dropped(&self, count: u64) {
        self.sorts_dropped.fetch_add(count, Ordering::Relaxed);
    }

    /// Add regex downgrades
    pub fn add_regex_downgrades(&self, count: u64) {
        self.regex_downgrades.fetch_add(count, Ordering::Relaxed);
    }

    /// Increment successful query count
    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment failed query count
    pub fn increment_queries_failed(&self) {
        self.queries_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Add rows handed back to clients
    pub fn add_rows_returned(&self, count: u64) {
        self.rows_returned.fetch_add(count, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_decoded: self.requests_decoded.load(Ordering::Relaxed),
            columns_dropped: self.columns_dropped.load(Ordering::Relaxed),
            sorts_dropped: self.sorts_dropped.load(Ordering::Relaxed),
            regex_downgrades: self.regex_downgrades.load(Ordering::Relaxed),
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            queries_failed: self.queries_failed.load(Ordering::Relaxed),
            rows_returned: self.rows_returned.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests_decoded: u64,
    pub columns_dropped: u64,
    pub sorts_dropped: u64,
    pub regex_downgrades: u64,
    pub queries_executed: u64,
    pub queries_failed: u64,
    pub rows_returned: u64,
}
