//! Greeter Module
//!
//! A deliberately slow greeting service and its cached decorator, used to
//! demonstrate read-through caching.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cache::{CacheConfig, ReadThroughCache};
use crate::error::{CacheError, Result};

/// Operation identifier of `SlowGreeter::greet` in the cache.
pub const GREET_OPERATION: &str = "greet";

// == Slow Greeter ==
/// Produces greetings after an artificial delay.
#[derive(Debug, Clone)]
pub struct SlowGreeter {
    delay: Duration,
    invocations: Arc<AtomicU64>,
}

impl SlowGreeter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            invocations: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Sleeps for the configured delay, then greets `name` with a timestamp.
    ///
    /// The timestamp makes each computed greeting distinguishable, so a cached
    /// answer is visibly the same string as the first one.
    pub async fn greet(&self, name: &str) -> anyhow::Result<String> {
        if name.trim().is_empty() {
            anyhow::bail!("name cannot be empty");
        }

        self.invocations.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        Ok(format!(
            "Hello {} @ {}",
            name,
            chrono::Utc::now().to_rfc3339()
        ))
    }

    /// Number of times `greet` actually ran.
    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::SeqCst)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

// == Cached Greeter ==
/// `SlowGreeter` decorated with a read-through cache.
#[derive(Debug, Clone)]
pub struct CachedGreeter {
    greeter: SlowGreeter,
    cache: ReadThroughCache<String>,
}

impl CachedGreeter {
    pub fn new(greeter: SlowGreeter, config: CacheConfig) -> Self {
        info!(
            "Caching greetings in '{}' (ttl={:?}, max_entries={:?})",
            config.cache_name, config.ttl, config.max_entries
        );
        Self {
            greeter,
            cache: ReadThroughCache::new(config),
        }
    }

    /// Returns the greeting for `name`, computing it only on a cache miss.
    pub async fn greet(&self, name: &str) -> Result<String> {
        if name.trim().is_empty() {
            return Err(CacheError::InvalidRequest(
                "Name cannot be empty".to_string(),
            ));
        }

        let greeter = self.greeter.clone();
        let owned = name.to_string();
        self.cache
            .get(GREET_OPERATION, &(name,), || async move {
                greeter.greet(&owned).await
            })
            .await
    }

    /// Drops the cached greeting for `name`. Returns whether one existed.
    pub fn forget(&self, name: &str) -> Result<bool> {
        self.cache.invalidate(GREET_OPERATION, &(name,))
    }

    /// Drops every cached greeting. Returns how many were dropped.
    pub fn forget_all(&self) -> usize {
        self.cache.invalidate_all()
    }

    pub fn cache(&self) -> &ReadThroughCache<String> {
        &self.cache
    }

    pub fn greeter(&self) -> &SlowGreeter {
        &self.greeter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cached(delay: Duration) -> CachedGreeter {
        CachedGreeter::new(SlowGreeter::new(delay), CacheConfig::new("slow-greet"))
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_greeter_waits_and_greets() {
        let greeter = SlowGreeter::new(Duration::from_secs(10));
        let start = tokio::time::Instant::now();

        let greeting = greeter.greet("World").await.unwrap();

        assert!(greeting.starts_with("Hello World @ "));
        assert!(start.elapsed() >= Duration::from_secs(10));
        assert_eq!(greeter.invocations(), 1);
    }

    #[tokio::test]
    async fn test_slow_greeter_rejects_empty_name() {
        let greeter = SlowGreeter::new(Duration::ZERO);
        assert!(greeter.greet("  ").await.is_err());
        assert_eq!(greeter.invocations(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_greeter_reuses_greeting() {
        let greeter = cached(Duration::from_secs(10));

        let first = greeter.greet("World").await.unwrap();
        let start = tokio::time::Instant::now();
        let second = greeter.greet("World").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(greeter.greeter().invocations(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_greeter_forget() {
        let greeter = cached(Duration::from_millis(10));

        greeter.greet("World").await.unwrap();
        greeter.greet("Sicily").await.unwrap();

        assert!(greeter.forget("World").unwrap());
        assert!(!greeter.forget("World").unwrap());
        greeter.greet("World").await.unwrap();
        assert_eq!(greeter.greeter().invocations(), 3);

        assert_eq!(greeter.forget_all(), 2);
        assert!(greeter.cache().is_empty());
    }

    #[tokio::test]
    async fn test_cached_greeter_rejects_empty_name() {
        let greeter = cached(Duration::ZERO);
        let result = greeter.greet("").await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
        assert_eq!(greeter.cache().stats().misses, 0);
    }
}
