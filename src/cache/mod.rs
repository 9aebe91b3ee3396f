//! Cache Module
//!
//! TTL-bounded, namespaced response caching over a pluggable storage
//! substrate: per-read freshness, lazy expiry, miss-population and
//! prefix-based bulk invalidation.

mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::ResponseCache;

use std::time::Duration;

// == Public Constants ==
/// Namespace prefix applied to every logical key when none is configured
pub const DEFAULT_NAMESPACE: &str = "cache_";

/// Freshness window for callers without a specific staleness tolerance
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);
