//! Cache activity metrics
//!
//! Lightweight atomic counters tracking hits, misses, relocations and
//! failures, with a consistent-enough snapshot for reporting.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for cache manager activity
#[derive(Debug, Default)]
pub struct CacheMetrics {
    /// Reads answered by the first probed shard
    hits: AtomicU64,
    /// Reads answered by a fallback probe on a non-candidate shard
    fallback_hits: AtomicU64,
    /// Reads that found nothing anywhere
    misses: AtomicU64,
    /// Successful writes
    writes: AtomicU64,
    /// Writes that failed at the codec or the backend
    write_failures: AtomicU64,
    /// Delete operations issued
    deletes: AtomicU64,
    /// Individual shard probes that failed with a backend error
    probe_failures: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub hits: u64,
    pub fallback_hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub write_failures: u64,
    pub deletes: u64,
    pub probe_failures: u64,
}

impl CacheMetrics {
    /// Create a zeroed metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback_hit(&self) {
        self.fallback_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_probe_failure(&self) {
        self.probe_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a snapshot of the current counter values
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            fallback_hits: self.fallback_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            probe_failures: self.probe_failures.load(Ordering::Relaxed),
        }
    }
}

impl MetricsSnapshot {
    /// Fraction of reads answered from any shard, or 1.0 with no reads
    pub fn hit_rate(&self) -> f64 {
        let reads = self.hits + self.fallback_hits + self.misses;
        if reads == 0 {
            return 1.0;
        }
        (self.hits + self.fallback_hits) as f64 / reads as f64
    }
}
