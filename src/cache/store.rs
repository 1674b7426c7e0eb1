//! Cache Store Module
//!
//! Keyed entry storage on an `lru::LruCache` with lazy TTL expiration. The
//! store itself is not synchronized; `ReadThroughCache` owns it behind a
//! lock.

use std::num::NonZeroUsize;
use std::time::Duration;

use lru::LruCache;

use crate::cache::{CacheEntry, CacheKey, CacheStats};

// == Cache Store ==
/// Entry storage with optional LRU bound and optional TTL.
///
/// Hits, inserts and removals are O(1) whether or not the store is bounded.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Entries in recency order
    entries: LruCache<CacheKey, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Lifetime applied to every new entry, None = never expires
    ttl: Option<Duration>,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// A `max_entries` of zero is treated as one.
    pub fn new(max_entries: Option<usize>, ttl: Option<Duration>) -> Self {
        let entries = match max_entries {
            Some(max) => LruCache::new(NonZeroUsize::new(max).unwrap_or(NonZeroUsize::MIN)),
            None => LruCache::unbounded(),
        };

        Self {
            entries,
            stats: CacheStats::new(),
            ttl,
        }
    }

    // == Get ==
    /// Returns a clone of the live value for `key`.
    ///
    /// A hit refreshes the key's recency and is counted. An expired entry is
    /// removed and reported as absent. Misses are not counted here since the
    /// caller decides whether the call computes or joins a computation.
    pub fn get(&mut self, key: &CacheKey) -> Option<V>
    where
        V: Clone,
    {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.is_expired() => true,
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                return Some(value);
            }
            None => false,
        };

        if expired {
            self.remove(key);
        }
        None
    }

    // == Insert ==
    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// When a new key would exceed the capacity bound, the least recently
    /// used entry is evicted. Returns the evicted key, if any.
    pub fn insert(&mut self, key: CacheKey, value: V) -> Option<CacheKey> {
        let replacing = self.entries.contains(&key);
        let displaced = self.entries.push(key, CacheEntry::new(value, self.ttl));
        self.stats.set_total_entries(self.entries.len());

        match displaced {
            Some((evicted, _)) if !replacing => {
                self.stats.record_eviction();
                Some(evicted)
            }
            _ => None,
        }
    }

    // == Remove ==
    /// Removes the entry for `key`. Returns whether one existed.
    pub fn remove(&mut self, key: &CacheKey) -> bool {
        let removed = self.entries.pop(key).is_some();
        if removed {
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Clear ==
    /// Removes every entry. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.stats.set_total_entries(0);
        count
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();
        for key in &expired_keys {
            self.entries.pop(key);
        }

        self.stats.set_total_entries(self.entries.len());
        count
    }

    /// Returns a snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Mutable access to the counters for the read-through layer.
    pub fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }

    /// Whether a live entry exists for `key`. Does not refresh recency.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries
            .peek(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> CacheKey {
        CacheKey::derive("test", "op", &(name,)).unwrap()
    }

    #[test]
    fn test_store_new() {
        let store: CacheStore<String> = CacheStore::new(Some(100), None);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_insert_and_get() {
        let mut store = CacheStore::new(None, None);

        store.insert(key("key1"), "value1".to_string());

        assert_eq!(store.get(&key("key1")), Some("value1".to_string()));
        assert_eq!(store.get(&key("missing")), None);
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().hits, 1);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new(Some(100), None);

        store.insert(key("key1"), 1);
        store.insert(key("key1"), 2);

        assert_eq!(store.get(&key("key1")), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_remove() {
        let mut store = CacheStore::new(None, None);

        store.insert(key("key1"), 1);
        assert!(store.remove(&key("key1")));
        assert!(!store.remove(&key("key1")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_clear() {
        let mut store = CacheStore::new(None, None);
        store.insert(key("a"), 1);
        store.insert(key("b"), 2);

        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert_eq!(store.get(&key("a")), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(None, Some(Duration::from_secs(1)));

        store.insert(key("key1"), 1);
        assert_eq!(store.get(&key("key1")), Some(1));

        tokio::time::advance(Duration::from_millis(1100)).await;

        assert_eq!(store.get(&key("key1")), None);
        assert!(store.is_empty(), "expired entry is dropped on access");
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = CacheStore::new(Some(3), None);

        store.insert(key("key1"), 1);
        store.insert(key("key2"), 2);
        store.insert(key("key3"), 3);
        let evicted = store.insert(key("key4"), 4);

        assert_eq!(evicted, Some(key("key1")));
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(&key("key1")), None);
        assert!(store.contains(&key("key2")));
        assert!(store.contains(&key("key4")));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = CacheStore::new(Some(3), None);

        store.insert(key("key1"), 1);
        store.insert(key("key2"), 2);
        store.insert(key("key3"), 3);

        store.get(&key("key1"));
        store.insert(key("key4"), 4);

        assert!(store.contains(&key("key1")));
        assert!(!store.contains(&key("key2")));
    }

    #[test]
    fn test_store_contains_does_not_refresh_recency() {
        let mut store = CacheStore::new(Some(2), None);
        store.insert(key("a"), 1);
        store.insert(key("b"), 2);

        assert!(store.contains(&key("a")));
        let evicted = store.insert(key("c"), 3);

        assert_eq!(evicted, Some(key("a")));
    }

    #[test]
    fn test_store_unbounded_keeps_everything() {
        let mut store = CacheStore::new(None, None);
        for i in 0..1000 {
            store.insert(key(&i.to_string()), i);
        }

        assert_eq!(store.len(), 1000);
        assert_eq!(store.get(&key("0")), Some(0));
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_store_overwrite_at_capacity_does_not_evict() {
        let mut store = CacheStore::new(Some(2), None);
        store.insert(key("a"), 1);
        store.insert(key("b"), 2);

        assert_eq!(store.insert(key("a"), 3), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_zero_capacity_holds_one() {
        let mut store = CacheStore::new(Some(0), None);
        store.insert(key("a"), 1);
        store.insert(key("b"), 2);

        assert_eq!(store.len(), 1);
        assert!(store.contains(&key("b")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_cleanup_expired() {
        let mut store = CacheStore::new(None, Some(Duration::from_secs(1)));
        store.insert(key("key1"), 1);

        tokio::time::advance(Duration::from_millis(600)).await;
        store.insert(key("key2"), 2);

        tokio::time::advance(Duration::from_millis(600)).await;

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&key("key2")), Some(2));
    }
}
