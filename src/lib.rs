//! Response Cache - a TTL-bounded, namespaced memoization layer
//!
//! Sits between a caller and an expensive asynchronous data source,
//! storing fetched values in a pluggable persistent key/value substrate
//! and serving them back until the caller's freshness window elapses.

pub mod cache;
pub mod config;
pub mod error;
pub mod storage;

pub use cache::{CacheEntry, CacheStats, ResponseCache, DEFAULT_NAMESPACE, DEFAULT_TTL};
pub use config::CacheConfig;
pub use error::{Result, StorageError};
pub use storage::{FileStore, MemoryStore, StorageBackend};
