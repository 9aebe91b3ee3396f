//! In-Memory Backend
//!
//! HashMap-backed substrate with an optional byte quota. Doubles as the
//! test backend since it needs no filesystem.

use std::collections::HashMap;

use crate::error::{Result, StorageError};
use crate::storage::StorageBackend;

// == Memory Store ==
/// In-memory key/value substrate.
///
/// The quota counts the sum of key and value byte lengths across all
/// stored pairs; replacing a value accounts for the bytes it frees.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    max_bytes: Option<usize>,
    used_bytes: usize,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an unlimited in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an in-memory store that rejects writes beyond `max_bytes`.
    pub fn with_quota(max_bytes: usize) -> Self {
        Self {
            max_bytes: Some(max_bytes),
            ..Self::default()
        }
    }

    /// Returns the bytes currently accounted against the quota.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }
}

impl StorageBackend for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let added = key.len() + value.len();
        let freed = self
            .entries
            .get(key)
            .map(|old| key.len() + old.len())
            .unwrap_or(0);
        let needed = self.used_bytes - freed + added;

        if let Some(limit) = self.max_bytes {
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        self.used_bytes = needed;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if let Some(old) = self.entries.remove(key) {
            self.used_bytes -= key.len() + old.len();
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}
