//! Cache Statistics Module
//!
//! Tracks read-through activity: hits, misses, evictions, coalesced waiters
//! and failed computations.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Calls answered from a stored entry
    pub hits: u64,
    /// Calls that found no live entry and started a computation
    pub misses: u64,
    /// Calls that joined a computation already in flight
    pub coalesced: u64,
    /// Computations that failed, timed out or were cancelled
    pub failures: u64,
    /// Entries evicted due to the LRU capacity bound
    pub evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Computations currently running
    pub in_flight: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses + coalesced), or 0.0 with no traffic.
    ///
    /// Coalesced callers count against the hit rate since they waited on a
    /// computation.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses + self.coalesced;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_coalesced(&mut self) {
        self.coalesced += 1;
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }

    pub fn set_in_flight(&mut self, count: usize) {
        self.in_flight = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        stats.record_coalesced();
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        assert_eq!(stats.hit_rate(), 1.0);
    }

    #[test]
    fn test_counters() {
        let mut stats = CacheStats::new();
        stats.record_eviction();
        stats.record_eviction();
        stats.record_failure();
        stats.set_total_entries(42);
        stats.set_in_flight(3);

        assert_eq!(stats.evictions, 2);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.total_entries, 42);
        assert_eq!(stats.in_flight, 3);
    }
}
