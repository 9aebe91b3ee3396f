//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the cache's core invariants over arbitrary
//! keys, values and operation sequences.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::cache::ResponseCache;
use crate::storage::{MemoryStore, StorageBackend};

// == Test Configuration ==
const LONG_TTL: Duration = Duration::from_secs(3600);

// == Strategies ==
/// Generates logical cache keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_:]{1,24}"
}

/// Generates cache values
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,64}"
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Remove { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Remove { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any key-value pair, storing the pair and then reading it back
    // under any tolerant TTL returns the exact value that was stored.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let cache = ResponseCache::new(MemoryStore::new());

        prop_assert!(cache.set(&key, &value));
        prop_assert_eq!(cache.get::<String>(&key, LONG_TTL), Some(value));
    }

    // For any key, storing V1 and then V2 results in reads observing V2.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        first in value_strategy(),
        second in value_strategy(),
    ) {
        let cache = ResponseCache::new(MemoryStore::new());

        cache.set(&key, &first);
        cache.set(&key, &second);

        prop_assert_eq!(cache.get::<String>(&key, LONG_TTL), Some(second));
        prop_assert_eq!(cache.len(), 1);
    }

    // For any stored key, removal makes subsequent reads observe absence,
    // and removing again is still a success.
    #[test]
    fn prop_remove_removes_entry(key in key_strategy(), value in value_strategy()) {
        let cache = ResponseCache::new(MemoryStore::new());

        cache.set(&key, &value);
        cache.remove(&key);
        cache.remove(&key);

        prop_assert_eq!(cache.get::<String>(&key, LONG_TTL), None);
        prop_assert!(cache.is_empty());
    }

    // Prefix invalidation partitions the key space exactly: an entry
    // disappears iff its logical key starts with the prefix.
    #[test]
    fn prop_prefix_invalidation_partition(
        keys in prop::collection::hash_set(key_strategy(), 1..16),
        prefix in "[a-z0-9_:]{0,3}",
    ) {
        let cache = ResponseCache::new(MemoryStore::new());
        for key in &keys {
            cache.set(key, key);
        }

        cache.invalidate_by_prefix(&prefix);

        for key in &keys {
            let found = cache.get::<String>(key, LONG_TTL);
            if key.starts_with(&prefix) {
                prop_assert_eq!(found, None, "key {} should be invalidated", key);
            } else {
                prop_assert_eq!(found, Some(key.clone()), "key {} should survive", key);
            }
        }
    }

    // Clearing the cache removes every namespaced entry and nothing else
    // sharing the same substrate.
    #[test]
    fn prop_clear_spares_foreign_keys(
        keys in prop::collection::hash_set(key_strategy(), 1..8),
        foreign in prop::collection::hash_set("[a-z]{1,10}", 1..8),
    ) {
        let mut store = MemoryStore::new();
        for key in &foreign {
            // Guaranteed outside the "cache_" namespace
            store.set(&format!("ext_{}", key), "foreign").unwrap();
        }

        let cache = ResponseCache::new(store);
        for key in &keys {
            cache.set(key, key);
        }

        cache.clear();
        prop_assert!(cache.is_empty());

        let store = cache.into_backend();
        prop_assert_eq!(store.keys().unwrap().len(), foreign.len());
        for key in &foreign {
            prop_assert!(store.get(&format!("ext_{}", key)).unwrap().is_some(), "foreign key missing");
        }
    }

    // For any sequence of cache operations, the hit and miss counters
    // reflect exactly the lookup outcomes that occurred.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let cache = ResponseCache::new(MemoryStore::new());
        let mut mirror: HashMap<String, String> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(&key, &value);
                    mirror.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let found = cache.get::<String>(&key, LONG_TTL);
                    match mirror.get(&key) {
                        Some(expected) => {
                            prop_assert_eq!(found.as_ref(), Some(expected));
                            expected_hits += 1;
                        }
                        None => {
                            prop_assert_eq!(found, None);
                            expected_misses += 1;
                        }
                    }
                }
                CacheOp::Remove { key } => {
                    cache.remove(&key);
                    mirror.remove(&key);
                }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.entries, mirror.len(), "Entry count mismatch");
    }
}
