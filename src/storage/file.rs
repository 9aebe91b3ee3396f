//! File-Backed Backend
//!
//! Persists the substrate as a single JSON document on disk: loaded once
//! at open, rewritten on every mutation. Suits the cache's scale of a few
//! hundred response-sized entries per client.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::warn;

use crate::error::{Result, StorageError};
use crate::storage::StorageBackend;

// == File Store ==
/// Durable key/value substrate backed by one JSON file.
///
/// A missing file means an empty store; an unreadable or corrupt file is
/// logged and also treated as empty rather than failing the open. The
/// optional quota bounds the serialized document size.
#[derive(Debug)]
pub struct FileStore {
    /// Location of the JSON document
    path: PathBuf,
    /// In-memory view of the document, kept consistent with disk
    entries: HashMap<String, String>,
    /// Maximum serialized document size in bytes, None for unlimited
    max_bytes: Option<usize>,
}

impl FileStore {
    // == Constructors ==
    /// Opens (or creates) a store at the given path.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load(&path);
        Self {
            path,
            entries,
            max_bytes: None,
        }
    }

    /// Opens a store at the given path with a byte quota on the document.
    pub fn open_with_quota(path: impl Into<PathBuf>, max_bytes: usize) -> Self {
        let mut store = Self::open(path);
        store.max_bytes = Some(max_bytes);
        store
    }

    /// Opens a store at the platform cache location
    /// (`~/.cache/response-cache/store.json` on Linux, or the XDG
    /// equivalent elsewhere).
    ///
    /// Returns `None` if the cache directory cannot be determined
    /// (e.g., no home directory).
    pub fn open_default() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "response-cache")?;
        Some(Self::open(project_dirs.cache_dir().join("store.json")))
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // == Disk I/O ==
    fn load(path: &Path) -> HashMap<String, String> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "store file unreadable, starting empty");
                return HashMap::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "store file corrupt, starting empty");
                HashMap::new()
            }
        }
    }

    /// Writes the current document to disk, enforcing the quota first.
    fn persist(&self) -> Result<()> {
        let document = serde_json::to_string(&self.entries)?;

        if let Some(limit) = self.max_bytes {
            if document.len() > limit {
                return Err(StorageError::QuotaExceeded {
                    needed: document.len(),
                    limit,
                });
            }
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, document)?;
        Ok(())
    }
}

impl StorageBackend for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(err) = self.persist() {
            // Roll back so memory and disk stay consistent
            match previous {
                Some(prev) => {
                    self.entries.insert(key.to_string(), prev);
                }
                None => {
                    self.entries.remove(key);
                }
            }
            return Err(err);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let previous = match self.entries.remove(key) {
            Some(prev) => prev,
            None => return Ok(()),
        };
        if let Err(err) = self.persist() {
            self.entries.insert(key.to_string(), previous);
            return Err(err);
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}
