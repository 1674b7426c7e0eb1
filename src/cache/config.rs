//! Cache Configuration Module
//!
//! Per-cache options: namespace, TTL, capacity bound and computation deadline.

use std::time::Duration;

/// Default namespace for caches built without an explicit name.
pub const DEFAULT_CACHE_NAME: &str = "default";

// == Cache Config ==
/// Options for one `ReadThroughCache`.
///
/// Every option is off by default: entries never expire, the cache is
/// unbounded and computations may run as long as they need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Namespace that distinguishes caches sharing one process
    pub cache_name: String,
    /// Entry lifetime, None = never expires
    pub ttl: Option<Duration>,
    /// LRU capacity bound, None = unbounded
    pub max_entries: Option<usize>,
    /// Deadline for a single computation, None = no deadline
    pub compute_timeout: Option<Duration>,
}

impl CacheConfig {
    /// Creates an unbounded, non-expiring configuration named `cache_name`.
    pub fn new(cache_name: impl Into<String>) -> Self {
        Self {
            cache_name: cache_name.into(),
            ttl: None,
            max_entries: None,
            compute_timeout: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    pub fn with_compute_timeout(mut self, timeout: Duration) -> Self {
        self.compute_timeout = Some(timeout);
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.cache_name, DEFAULT_CACHE_NAME);
        assert!(config.ttl.is_none());
        assert!(config.max_entries.is_none());
        assert!(config.compute_timeout.is_none());
    }

    #[test]
    fn test_cache_config_builder() {
        let config = CacheConfig::new("slow-greet")
            .with_ttl(Duration::from_secs(30))
            .with_max_entries(10)
            .with_compute_timeout(Duration::from_secs(5));

        assert_eq!(config.cache_name, "slow-greet");
        assert_eq!(config.ttl, Some(Duration::from_secs(30)));
        assert_eq!(config.max_entries, Some(10));
        assert_eq!(config.compute_timeout, Some(Duration::from_secs(5)));
    }
}
