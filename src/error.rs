//! Error types for the storage substrate
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Storage Error Enum ==
/// Unified error type for storage backends.
///
/// Only backends surface these; the cache collapses them into
/// miss/`false` outcomes at its public boundary.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Write rejected because it would exceed the backend's byte quota
    #[error("quota exceeded: {needed} bytes needed, limit is {limit} bytes")]
    QuotaExceeded { needed: usize, limit: usize },

    /// Underlying I/O failure
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backend's own document could not be serialized
    #[error("storage document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
