//! Configuration Module
//!
//! Handles loading and managing application configuration from environment
//! variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;

/// Application configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// A zero for `cache_ttl`, `cache_max_entries` or `compute_timeout` disables
/// that limit.
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace of the greeting cache
    pub cache_name: String,
    /// Entry lifetime in seconds
    pub cache_ttl: u64,
    /// Maximum number of cached greetings
    pub cache_max_entries: usize,
    /// Deadline for one greeting computation in seconds
    pub compute_timeout: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Artificial latency of the slow greeter in milliseconds
    pub greet_delay_ms: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_NAME` - Cache namespace (default: slow-greet)
    /// - `CACHE_TTL` - Entry TTL in seconds, 0 = none (default: 0)
    /// - `CACHE_MAX_ENTRIES` - LRU bound, 0 = unbounded (default: 0)
    /// - `COMPUTE_TIMEOUT` - Computation deadline in seconds, 0 = none (default: 0)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `GREET_DELAY_MS` - Slow greeter latency in milliseconds (default: 10000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_name: env::var("CACHE_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.cache_name),
            cache_ttl: parse_env("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            cache_max_entries: parse_env("CACHE_MAX_ENTRIES")
                .unwrap_or(defaults.cache_max_entries),
            compute_timeout: parse_env("COMPUTE_TIMEOUT").unwrap_or(defaults.compute_timeout),
            cleanup_interval: parse_env::<u64>("CLEANUP_INTERVAL")
                .filter(|&secs| secs > 0)
                .unwrap_or(defaults.cleanup_interval),
            greet_delay_ms: parse_env("GREET_DELAY_MS").unwrap_or(defaults.greet_delay_ms),
            server_port: parse_env("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Builds the cache options for the greeting cache.
    pub fn cache_config(&self) -> CacheConfig {
        let mut config = CacheConfig::new(self.cache_name.clone());
        if self.cache_ttl > 0 {
            config = config.with_ttl(Duration::from_secs(self.cache_ttl));
        }
        if self.cache_max_entries > 0 {
            config = config.with_max_entries(self.cache_max_entries);
        }
        if self.compute_timeout > 0 {
            config = config.with_compute_timeout(Duration::from_secs(self.compute_timeout));
        }
        config
    }

    pub fn greet_delay(&self) -> Duration {
        Duration::from_millis(self.greet_delay_ms)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_name: "slow-greet".to_string(),
            cache_ttl: 0,
            cache_max_entries: 0,
            compute_timeout: 0,
            cleanup_interval: 1,
            greet_delay_ms: 10_000,
            server_port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_name, "slow-greet");
        assert_eq!(config.cache_ttl, 0);
        assert_eq!(config.cache_max_entries, 0);
        assert_eq!(config.compute_timeout, 0);
        assert_eq!(config.cleanup_interval, 1);
        assert_eq!(config.greet_delay(), Duration::from_secs(10));
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_default_cache_config_has_no_limits() {
        let cache = Config::default().cache_config();
        assert_eq!(cache, CacheConfig::new("slow-greet"));
    }

    #[test]
    fn test_cache_config_limits() {
        let config = Config {
            cache_ttl: 30,
            cache_max_entries: 100,
            compute_timeout: 15,
            ..Config::default()
        };

        let cache = config.cache_config();
        assert_eq!(cache.ttl, Some(Duration::from_secs(30)));
        assert_eq!(cache.max_entries, Some(100));
        assert_eq!(cache.compute_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_config_from_env_defaults() {
        for name in [
            "CACHE_NAME",
            "CACHE_TTL",
            "CACHE_MAX_ENTRIES",
            "COMPUTE_TIMEOUT",
            "CLEANUP_INTERVAL",
            "GREET_DELAY_MS",
            "SERVER_PORT",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.cache_name, "slow-greet");
        assert_eq!(config.cache_ttl, 0);
        assert_eq!(config.cleanup_interval, 1);
        assert_eq!(config.greet_delay_ms, 10_000);
        assert_eq!(config.server_port, 3000);
    }
}
