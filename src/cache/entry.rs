//! Cache Entry Module
//!
//! Defines the serialized envelope wrapping each cached payload.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// Envelope for a single cached payload.
///
/// The TTL is deliberately not part of the entry: freshness is a property
/// of the read, so the same stored entry can be interpreted under
/// different staleness tolerances by different callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The stored payload
    pub value: Value,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
}

impl CacheEntry {
    // == Constructor ==
    /// Wraps a payload, stamping the current time as its creation instant.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            created_at: current_timestamp_ms(),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived the reader's TTL.
    ///
    /// Boundary condition: an entry whose age equals the TTL exactly is
    /// still fresh; it expires strictly after the window has elapsed
    /// (`age > ttl`).
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.is_expired_at(current_timestamp_ms(), ttl)
    }

    /// Freshness check against an explicit clock reading.
    ///
    /// A `created_at` in the future (clock moved backwards) counts as
    /// age zero.
    pub fn is_expired_at(&self, now_ms: i64, ttl: Duration) -> bool {
        let age_ms = (now_ms - self.created_at).max(0) as u128;
        age_ms > ttl.as_millis()
    }

    // == Age ==
    /// Returns the entry's age in milliseconds.
    pub fn age_ms(&self) -> u64 {
        (current_timestamp_ms() - self.created_at).max(0) as u64
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
