//! Response Cache Module
//!
//! Core cache engine: namespaced TTL lookups, miss-population and bulk
//! invalidation over an injected storage backend.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats, DEFAULT_NAMESPACE};
use crate::config::CacheConfig;
use crate::error::StorageError;
use crate::storage::StorageBackend;

// == Lookup Outcome ==
/// Internal result of a namespaced lookup.
///
/// Collapsed to `Option<T>` at the public boundary: callers see absence,
/// the cache's own accounting sees why.
#[derive(Debug)]
enum Lookup<T> {
    /// Valid entry found
    Hit(T),
    /// No entry under the key
    Miss,
    /// Entry found but older than the reader's TTL
    Expired,
    /// Entry found but not deserializable
    Corrupt,
    /// The backend failed to read
    StorageFailed(StorageError),
}

// == Response Cache ==
/// TTL-bounded memoization layer between a caller and an expensive data
/// source.
///
/// The cache owns its storage backend and a namespace prefix; every
/// logical key is namespaced before it touches the backend, so bulk
/// operations never disturb unrelated data sharing the same substrate.
/// Freshness is decided per read: the TTL is supplied by the caller, not
/// stored with the entry, and expired entries are purged lazily on first
/// touch rather than by a background sweep.
pub struct ResponseCache<S: StorageBackend> {
    /// Backend and counters, guarded together so operations are atomic
    /// with respect to each other
    inner: Mutex<Inner<S>>,
    /// Prefix applied to every logical key before it reaches the backend
    namespace: String,
}

struct Inner<S> {
    backend: S,
    stats: CacheStats,
}

impl<S: StorageBackend> ResponseCache<S> {
    // == Constructors ==
    /// Creates a cache over `backend` with the default namespace.
    pub fn new(backend: S) -> Self {
        Self::with_namespace(backend, DEFAULT_NAMESPACE)
    }

    /// Creates a cache over `backend` with an explicit namespace prefix.
    pub fn with_namespace(backend: S, namespace: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                backend,
                stats: CacheStats::new(),
            }),
            namespace: namespace.into(),
        }
    }

    /// Creates a cache over `backend` configured from a [`CacheConfig`].
    pub fn with_config(backend: S, config: &CacheConfig) -> Self {
        Self::with_namespace(backend, config.namespace.clone())
    }

    /// Returns the namespace prefix.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Consumes the cache and releases its backend.
    pub fn into_backend(self) -> S {
        self.inner
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .backend
    }

    // == Get ==
    /// Retrieves the value cached under `key` if one exists and is no
    /// older than `ttl`.
    ///
    /// An entry aged strictly beyond `ttl` is deleted on the spot (lazy
    /// expiry) and reported as absent. A corrupt stored payload and a
    /// backend read failure are also reported as absent: a broken cache
    /// entry is no worse than a missing one, and callers should never
    /// have to special-case cache errors.
    pub fn get<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        let storage_key = self.storage_key(key);
        let mut inner = self.lock();

        match Self::lookup(&mut inner, &storage_key, ttl) {
            Lookup::Hit(value) => {
                inner.stats.record_hit();
                debug!(key, "cache hit");
                Some(value)
            }
            Lookup::Miss => {
                inner.stats.record_miss();
                debug!(key, "cache miss");
                None
            }
            Lookup::Expired => {
                inner.stats.record_miss();
                inner.stats.record_expiration();
                debug!(key, "cache entry expired");
                None
            }
            Lookup::Corrupt => {
                inner.stats.record_miss();
                inner.stats.record_corrupt();
                warn!(key, "ignoring corrupt cache entry");
                None
            }
            Lookup::StorageFailed(err) => {
                inner.stats.record_miss();
                warn!(key, error = %err, "storage read failed, treating as miss");
                None
            }
        }
    }

    // == Set ==
    /// Caches `value` under `key`, overwriting any prior entry and
    /// resetting its creation timestamp.
    ///
    /// Returns `false` if the value cannot be serialized or the backend
    /// rejects the write (e.g. quota exhaustion); prior state is left
    /// intact and the caller is never blocked by a caching failure.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let raw = match serde_json::to_value(value)
            .map(CacheEntry::new)
            .and_then(|entry| serde_json::to_string(&entry))
        {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, error = %err, "cache value not serializable, skipping write");
                self.lock().stats.record_write_failure();
                return false;
            }
        };

        let storage_key = self.storage_key(key);
        let mut inner = self.lock();
        match inner.backend.set(&storage_key, &raw) {
            Ok(()) => true,
            Err(err) => {
                inner.stats.record_write_failure();
                warn!(key, error = %err, "storage write rejected, value not cached");
                false
            }
        }
    }

    // == Remove ==
    /// Deletes the entry cached under `key`; no-op on an absent key.
    pub fn remove(&self, key: &str) {
        let storage_key = self.storage_key(key);
        let mut inner = self.lock();
        if let Err(err) = inner.backend.remove(&storage_key) {
            warn!(key, error = %err, "storage remove failed");
        }
    }

    // == Clear ==
    /// Deletes every entry under the cache's namespace, regardless of key
    /// or freshness. Keys outside the namespace are never touched.
    pub fn clear(&self) {
        self.remove_matching("");
    }

    // == Invalidate By Prefix ==
    /// Deletes every entry whose logical key starts with `key_prefix`,
    /// leaving the rest of the cache (and all foreign keys) intact.
    ///
    /// Used to bulk-invalidate a family of related entries, e.g. every
    /// entry for one resource type after that resource changes.
    pub fn invalidate_by_prefix(&self, key_prefix: &str) {
        self.remove_matching(key_prefix);
    }

    // == Get Or Fetch ==
    /// Returns the cached value under `key` if fresh, otherwise invokes
    /// `fetch` exactly once, caches its result and returns it.
    ///
    /// A fetch failure propagates verbatim and writes nothing, so a
    /// failed attempt never poisons the cache. A failed cache write after
    /// a successful fetch degrades silently to "not cached": the fresh
    /// value is still returned.
    ///
    /// The internal lock is not held while `fetch` runs, so concurrent
    /// calls for the same missing key may each invoke their own fetch
    /// (cache stampede). No request coalescing is provided; callers
    /// needing it should layer a per-key in-flight map above this cache.
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: &str, ttl: Duration, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get(key, ttl) {
            return Ok(value);
        }

        let value = fetch().await?;
        self.set(key, &value);
        Ok(value)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        let mut stats = inner.stats.clone();
        stats.set_entries(Self::count_namespaced(&inner, &self.namespace));
        stats
    }

    // == Length ==
    /// Returns the number of entries currently under the namespace,
    /// fresh or not.
    pub fn len(&self) -> usize {
        let inner = self.lock();
        Self::count_namespaced(&inner, &self.namespace)
    }

    /// Returns true if no entries exist under the namespace.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Internals ==
    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        // A poisoning panic cannot leave the guarded state half-updated:
        // every critical section performs at most one backend mutation.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Resolves a namespaced key to a lookup outcome, purging the entry
    /// if it turned out to be expired.
    fn lookup<T: DeserializeOwned>(inner: &mut Inner<S>, storage_key: &str, ttl: Duration) -> Lookup<T> {
        let raw = match inner.backend.get(storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Lookup::Miss,
            Err(err) => return Lookup::StorageFailed(err),
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(_) => return Lookup::Corrupt,
        };

        if entry.is_expired(ttl) {
            if let Err(err) = inner.backend.remove(storage_key) {
                warn!(key = storage_key, error = %err, "failed to purge expired cache entry");
            }
            return Lookup::Expired;
        }

        match serde_json::from_value(entry.value) {
            Ok(value) => Lookup::Hit(value),
            Err(_) => Lookup::Corrupt,
        }
    }

    /// Deletes every backend key matching the namespaced prefix.
    ///
    /// Enumerates the backend exactly once; keys outside the namespace
    /// never match because the namespace itself is part of the prefix.
    fn remove_matching(&self, key_prefix: &str) {
        let full_prefix = self.storage_key(key_prefix);
        let mut inner = self.lock();

        let keys = match inner.backend.keys() {
            Ok(keys) => keys,
            Err(err) => {
                warn!(error = %err, "storage enumeration failed, nothing invalidated");
                return;
            }
        };

        let mut removed = 0usize;
        for key in keys.iter().filter(|k| k.starts_with(full_prefix.as_str())) {
            match inner.backend.remove(key) {
                Ok(()) => removed += 1,
                Err(err) => warn!(key = key.as_str(), error = %err, "storage remove failed"),
            }
        }
        debug!(prefix = key_prefix, removed, "invalidated cache entries");
    }

    fn count_namespaced(inner: &Inner<S>, namespace: &str) -> usize {
        inner
            .backend
            .keys()
            .map(|keys| keys.iter().filter(|k| k.starts_with(namespace)).count())
            .unwrap_or(0)
    }
}
