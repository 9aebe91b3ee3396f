//! Configuration Module
//!
//! Handles loading cache settings from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::DEFAULT_NAMESPACE;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Prefix applied to every logical key before it reaches the storage backend
    pub namespace: String,
    /// Freshness window, in minutes, for callers without a specific staleness tolerance
    pub default_ttl_minutes: u64,
    /// Byte quota for the storage backend, None for unlimited
    pub max_store_bytes: Option<usize>,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_NAMESPACE` - key prefix (default: "cache_")
    /// - `CACHE_TTL_MINUTES` - default freshness window (default: 60)
    /// - `CACHE_MAX_BYTES` - backend byte quota (default: unlimited)
    pub fn from_env() -> Self {
        Self {
            namespace: env::var("CACHE_NAMESPACE")
                .unwrap_or_else(|_| DEFAULT_NAMESPACE.to_string()),
            default_ttl_minutes: env::var("CACHE_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            max_store_bytes: env::var("CACHE_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    /// Returns the default freshness window as a Duration.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_minutes * 60)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            default_ttl_minutes: 60,
            max_store_bytes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.namespace, "cache_");
        assert_eq!(config.default_ttl_minutes, 60);
        assert_eq!(config.max_store_bytes, None);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_NAMESPACE");
        env::remove_var("CACHE_TTL_MINUTES");
        env::remove_var("CACHE_MAX_BYTES");

        let config = CacheConfig::from_env();
        assert_eq!(config.namespace, "cache_");
        assert_eq!(config.default_ttl_minutes, 60);
        assert_eq!(config.max_store_bytes, None);
    }

    #[test]
    fn test_default_ttl_duration() {
        let config = CacheConfig {
            default_ttl_minutes: 5,
            ..CacheConfig::default()
        };
        assert_eq!(config.default_ttl(), Duration::from_secs(300));
    }
}
