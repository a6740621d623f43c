//! Metrics hooks for deduplication operations
//!
//! Provides instrumentation points for monitoring chain growth, memory
//! usage, insert/lookup outcomes and snapshot flushes.
//!
//! ## Usage
//!
//! ```ignore
//! use dedup_filters::metrics::{Metrics, MetricsRecorder};
//!
//! let metrics = Metrics::new();
//! let start = std::time::Instant::now();
//! let found = chain.exists(item);
//! metrics.record_lookup(start.elapsed(), found);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector for deduplication operations
///
/// Thread-safe counters shared by every collection of a registry.
#[derive(Default)]
pub struct Metrics {
    /// Total collections created (lazily or from snapshots)
    pub collections_created: AtomicU64,
    /// Total filter units created
    pub units_created: AtomicU64,
    /// Total bytes allocated for bit arrays
    pub bytes_allocated: AtomicU64,
    /// Adds that inserted a new item
    pub items_added: AtomicU64,
    /// Adds that found the item already present
    pub items_duplicate: AtomicU64,
    /// Total lookups performed
    pub lookups_performed: AtomicU64,
    /// Lookups that reported the item present (possibly false positives)
    pub lookups_positive: AtomicU64,
    /// Requests rejected by the allow-list
    pub requests_rejected: AtomicU64,
    /// Successful snapshot saves
    pub flushes_succeeded: AtomicU64,
    /// Failed snapshot saves
    pub flushes_failed: AtomicU64,
    /// Cumulative add time in nanoseconds
    pub insert_time_ns: AtomicU64,
    /// Cumulative lookup time in nanoseconds
    pub lookup_time_ns: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new collection
    pub fn record_collection_created(&self) {
        self.collections_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Record filter unit creation
    ///
    /// # Arguments
    /// * `size_bits` - Unit size in bits
    /// * `hash_count` - Number of hash functions (k)
    /// * `capacity` - Designed capacity of the unit
    pub fn record_unit_created(&self, size_bits: usize, _hash_count: usize, _capacity: usize) {
        self.units_created.fetch_add(1, Ordering::Relaxed);
        self.bytes_allocated
            .fetch_add(size_bits.div_ceil(8) as u64, Ordering::Relaxed);
    }

    /// Record an add
    ///
    /// # Arguments
    /// * `duration` - Time taken for the add
    /// * `already_present` - Whether the item was reported present
    pub fn record_insert(&self, duration: Duration, already_present: bool) {
        if already_present {
            self.items_duplicate.fetch_add(1, Ordering::Relaxed);
        } else {
            self.items_added.fetch_add(1, Ordering::Relaxed);
        }
        self.insert_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Record a lookup
    ///
    /// # Arguments
    /// * `duration` - Time taken for the lookup
    /// * `found` - Whether the item was found (possibly false positive)
    pub fn record_lookup(&self, duration: Duration, found: bool) {
        self.lookups_performed.fetch_add(1, Ordering::Relaxed);
        self.lookup_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        if found {
            self.lookups_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a request rejected before touching any chain
    pub fn record_rejected(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a snapshot save attempt
    pub fn record_flush(&self, succeeded: bool) {
        if succeeded {
            self.flushes_succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.flushes_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            collections_created: self.collections_created.load(Ordering::Relaxed),
            units_created: self.units_created.load(Ordering::Relaxed),
            bytes_allocated: self.bytes_allocated.load(Ordering::Relaxed),
            items_added: self.items_added.load(Ordering::Relaxed),
            items_duplicate: self.items_duplicate.load(Ordering::Relaxed),
            lookups_performed: self.lookups_performed.load(Ordering::Relaxed),
            lookups_positive: self.lookups_positive.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
            flushes_succeeded: self.flushes_succeeded.load(Ordering::Relaxed),
            flushes_failed: self.flushes_failed.load(Ordering::Relaxed),
            avg_insert_ns: self.avg_insert_time_ns(),
            avg_lookup_ns: self.avg_lookup_time_ns(),
        }
    }

    /// Calculate average add time in nanoseconds
    pub fn avg_insert_time_ns(&self) -> u64 {
        let total = self.insert_time_ns.load(Ordering::Relaxed);
        let count = self.items_added.load(Ordering::Relaxed)
            + self.items_duplicate.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Calculate average lookup time in nanoseconds
    pub fn avg_lookup_time_ns(&self) -> u64 {
        let total = self.lookup_time_ns.load(Ordering::Relaxed);
        let count = self.lookups_performed.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Share of adds that found the item already present
    pub fn duplicate_ratio(&self) -> f64 {
        let added = self.items_added.load(Ordering::Relaxed);
        let duplicate = self.items_duplicate.load(Ordering::Relaxed);
        let total = added + duplicate;
        if total > 0 {
            duplicate as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default)]
pub struct MetricsSnapshot {
    pub collections_created: u64,
    pub units_created: u64,
    pub bytes_allocated: u64,
    pub items_added: u64,
    pub items_duplicate: u64,
    pub lookups_performed: u64,
    pub lookups_positive: u64,
    pub requests_rejected: u64,
    pub flushes_succeeded: u64,
    pub flushes_failed: u64,
    pub avg_insert_ns: u64,
    pub avg_lookup_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to integrate with external metrics systems
/// like Prometheus or StatsD.
pub trait MetricsRecorder: Send + Sync {
    fn record_collection_created(&self);

    fn record_unit_created(&self, size_bits: usize, hash_count: usize, capacity: usize);

    fn record_insert(&self, duration: Duration, already_present: bool);

    fn record_lookup(&self, duration: Duration, found: bool);

    fn record_rejected(&self);

    fn record_flush(&self, succeeded: bool);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_collection_created(&self) {}
    fn record_unit_created(&self, _: usize, _: usize, _: usize) {}
    fn record_insert(&self, _: Duration, _: bool) {}
    fn record_lookup(&self, _: Duration, _: bool) {}
    fn record_rejected(&self) {}
    fn record_flush(&self, _: bool) {}
}

impl MetricsRecorder for Metrics {
    fn record_collection_created(&self) {
        Metrics::record_collection_created(self);
    }

    fn record_unit_created(&self, size_bits: usize, hash_count: usize, capacity: usize) {
        Metrics::record_unit_created(self, size_bits, hash_count, capacity);
    }

    fn record_insert(&self, duration: Duration, already_present: bool) {
        Metrics::record_insert(self, duration, already_present);
    }

    fn record_lookup(&self, duration: Duration, found: bool) {
        Metrics::record_lookup(self, duration, found);
    }

    fn record_rejected(&self) {
        Metrics::record_rejected(self);
    }

    fn record_flush(&self, succeeded: bool) {
        Metrics::record_flush(self, succeeded);
    }
}
