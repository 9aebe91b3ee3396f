//! Cache Statistics Module
//!
//! Tracks lookup outcomes and swallowed failures. The cache's public
//! boundary reports absence only; these counters keep the distinction
//! between miss, expiry, corruption and storage failure observable.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of lookups that returned a valid entry
    pub hits: u64,
    /// Number of lookups that returned absent (not present, expired, or corrupt)
    pub misses: u64,
    /// Entries lazily deleted because a read found them stale
    pub expirations: u64,
    /// Stored payloads that failed deserialization and were treated as misses
    pub corrupt_payloads: u64,
    /// Backend writes that were rejected (quota or I/O)
    pub write_failures: u64,
    /// Current number of namespaced keys in the backend
    pub entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Recorders ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Increments the lazy-expiry counter.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    /// Increments the corrupt-payload counter.
    pub fn record_corrupt(&mut self) {
        self.corrupt_payloads += 1;
    }

    /// Increments the rejected-write counter.
    pub fn record_write_failure(&mut self) {
        self.write_failures += 1;
    }

    /// Updates the namespaced-entry count.
    pub fn set_entries(&mut self, count: usize) {
        self.entries = count;
    }
}
