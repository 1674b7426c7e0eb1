//! Read-Through Cache Module
//!
//! Memoizes expensive async computations by operation and arguments, with
//! single-flight deduplication of concurrent misses.
//!
//! The store and the table of in-flight computations share one
//! `parking_lot::Mutex`. It is only held for bookkeeping and never across an
//! `.await`, so a slow computation does not block callers of other keys.
//! Each in-flight computation publishes its outcome on a `watch` channel that
//! followers subscribe to. Invalidation detaches in-flight computations: new
//! callers start a fresh one and the detached result is never stored.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::cache::{CacheConfig, CacheKey, CacheStats, CacheStore};
use crate::error::{CacheError, Result};

/// Outcome slot of one computation. `None` until the leader finishes.
type Outcome<V> = Option<Result<V>>;

/// A running computation that new callers for its key will join.
struct Flight<V> {
    id: u64,
    receiver: watch::Receiver<Outcome<V>>,
}

struct State<V> {
    store: CacheStore<V>,
    in_flight: HashMap<CacheKey, Flight<V>>,
    next_flight: u64,
}

impl<V> State<V> {
    /// Removes the in-flight record of flight `id`. Returns false if the
    /// flight was already detached by an invalidation.
    fn retire(&mut self, key: &CacheKey, id: u64) -> bool {
        match self.in_flight.get(key) {
            Some(flight) if flight.id == id => {
                self.in_flight.remove(key);
                true
            }
            _ => false,
        }
    }
}

struct Shared<V> {
    config: CacheConfig,
    state: Mutex<State<V>>,
}

/// How a caller takes part in a miss.
enum Role<V> {
    /// Runs the computation and publishes the outcome.
    Leader(u64, watch::Sender<Outcome<V>>),
    /// Waits for the leader's outcome.
    Follower(watch::Receiver<Outcome<V>>),
}

// == Read-Through Cache ==
/// A read-through cache over async computations producing `V`.
///
/// Cloning is cheap and every clone shares the same entries.
///
/// # Example
/// ```
/// use read_through_cache::cache::{CacheConfig, ReadThroughCache};
///
/// # async fn example() -> read_through_cache::error::Result<()> {
/// let cache: ReadThroughCache<String> = ReadThroughCache::new(CacheConfig::new("greetings"));
///
/// let greeting = cache
///     .get("greet", &("World",), || async { Ok("Hello World".to_string()) })
///     .await?;
/// assert_eq!(greeting, "Hello World");
/// # Ok(())
/// # }
/// ```
pub struct ReadThroughCache<V> {
    shared: Arc<Shared<V>>,
}

impl<V> Clone for ReadThroughCache<V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<V> std::fmt::Debug for ReadThroughCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadThroughCache")
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

impl<V: Clone> ReadThroughCache<V> {
    // == Constructor ==
    /// Creates an empty cache with the given options.
    pub fn new(config: CacheConfig) -> Self {
        let store = CacheStore::new(config.max_entries, config.ttl);
        Self {
            shared: Arc::new(Shared {
                config,
                state: Mutex::new(State {
                    store,
                    in_flight: HashMap::new(),
                    next_flight: 0,
                }),
            }),
        }
    }

    // == Get ==
    /// Returns the cached value for `operation(args)`, running `compute` on a
    /// miss.
    ///
    /// Concurrent misses for the same key run `compute` once: the first
    /// caller computes and the rest wait for its outcome. Failed computations
    /// are never stored, so the next call retries.
    ///
    /// # Errors
    /// - `InvalidKeyDerivation` if `args` cannot be serialized
    /// - `ComputationFailed` if `compute` returns an error
    /// - `TimedOut` if `compute` exceeds the configured deadline
    /// - `Cancelled` if the computing caller was dropped before finishing
    pub async fn get<A, F, Fut>(&self, operation: &str, args: &A, compute: F) -> Result<V>
    where
        A: Serialize + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>>,
    {
        let key = CacheKey::derive(&self.shared.config.cache_name, operation, args)?;

        let role = {
            let mut guard = self.shared.state.lock();
            let state = &mut *guard;

            if let Some(value) = state.store.get(&key) {
                debug!("Cache hit: {}", key);
                return Ok(value);
            }

            if let Some(flight) = state.in_flight.get(&key) {
                let receiver = flight.receiver.clone();
                state.store.stats_mut().record_coalesced();
                debug!("Joining in-flight computation: {}", key);
                Role::Follower(receiver)
            } else {
                let (sender, receiver) = watch::channel(None);
                let id = state.next_flight;
                state.next_flight += 1;
                state.in_flight.insert(key.clone(), Flight { id, receiver });
                state.store.stats_mut().record_miss();
                debug!("Cache miss: {}", key);
                Role::Leader(id, sender)
            }
        };

        match role {
            Role::Leader(id, sender) => self.lead(key, id, sender, compute).await,
            Role::Follower(receiver) => follow(key, receiver).await,
        }
    }

    async fn lead<F, Fut>(
        &self,
        key: CacheKey,
        id: u64,
        sender: watch::Sender<Outcome<V>>,
        compute: F,
    ) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>>,
    {
        let guard = FlightGuard {
            shared: Arc::clone(&self.shared),
            key,
            id,
            sender: Some(sender),
        };

        let outcome = match self.shared.config.compute_timeout {
            Some(after) => match tokio::time::timeout(after, compute()).await {
                Ok(result) => result
                    .map_err(|e| CacheError::computation_failed(guard.key.to_string(), e)),
                Err(_) => Err(CacheError::TimedOut {
                    key: guard.key.to_string(),
                    after,
                }),
            },
            None => compute()
                .await
                .map_err(|e| CacheError::computation_failed(guard.key.to_string(), e)),
        };

        guard.complete(outcome.clone());
        outcome
    }

    // == Invalidate ==
    /// Removes the entry for `operation(args)`, if any.
    ///
    /// Returns whether a stored entry was removed. A computation already in
    /// flight for the key is detached: it still answers the callers waiting
    /// on it, but its result is not stored and the next `get` computes anew.
    pub fn invalidate<A>(&self, operation: &str, args: &A) -> Result<bool>
    where
        A: Serialize + ?Sized,
    {
        let key = CacheKey::derive(&self.shared.config.cache_name, operation, args)?;

        let mut guard = self.shared.state.lock();
        let state = &mut *guard;
        let removed = state.store.remove(&key);
        if state.in_flight.remove(&key).is_some() {
            debug!("Detached in-flight computation: {}", key);
        }
        if removed {
            debug!("Invalidated: {}", key);
        }
        Ok(removed)
    }

    // == Invalidate All ==
    /// Removes every entry and detaches every in-flight computation. Returns
    /// how many entries were dropped.
    pub fn invalidate_all(&self) -> usize {
        let count = {
            let mut state = self.shared.state.lock();
            state.in_flight.clear();
            state.store.clear()
        };
        debug!(
            "Invalidated all {} entries of cache '{}'",
            count, self.shared.config.cache_name
        );
        count
    }

    /// Sweeps expired entries. Returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        self.shared.state.lock().store.cleanup_expired()
    }

    /// Returns a snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        let state = self.shared.state.lock();
        let mut stats = state.store.stats();
        stats.set_in_flight(state.in_flight.len());
        stats
    }

    /// Whether a live entry exists for `operation(args)`.
    pub fn contains<A>(&self, operation: &str, args: &A) -> Result<bool>
    where
        A: Serialize + ?Sized,
    {
        let key = CacheKey::derive(&self.shared.config.cache_name, operation, args)?;
        Ok(self.shared.state.lock().store.contains(&key))
    }

    pub fn len(&self) -> usize {
        self.shared.state.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.state.lock().store.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.shared.config.cache_name
    }

    pub fn config(&self) -> &CacheConfig {
        &self.shared.config
    }
}

async fn follow<V: Clone>(key: CacheKey, mut receiver: watch::Receiver<Outcome<V>>) -> Result<V> {
    let outcome = receiver
        .wait_for(Option::is_some)
        .await
        .map(|outcome| (*outcome).clone());

    match outcome {
        Ok(Some(result)) => result,
        _ => Err(CacheError::Cancelled(key.to_string())),
    }
}

// == Flight Guard ==
/// Retires the in-flight record of a leader.
///
/// On completion the outcome is stored (if successful and not detached) and
/// the record removed under one lock, then published. If the leader is
/// dropped first, the record is removed and the sender closed, so followers
/// see `Cancelled` and the key is free for a new computation.
struct FlightGuard<V> {
    shared: Arc<Shared<V>>,
    key: CacheKey,
    id: u64,
    sender: Option<watch::Sender<Outcome<V>>>,
}

impl<V: Clone> FlightGuard<V> {
    fn complete(mut self, outcome: Result<V>) {
        {
            let mut guard = self.shared.state.lock();
            let state = &mut *guard;
            let attached = state.retire(&self.key, self.id);

            match &outcome {
                Ok(value) if attached => {
                    if let Some(evicted) = state.store.insert(self.key.clone(), value.clone()) {
                        debug!("Evicted least recently used entry: {}", evicted);
                    }
                }
                Ok(_) => {
                    debug!("Discarding result of invalidated computation: {}", self.key);
                }
                Err(e) => {
                    state.store.stats_mut().record_failure();
                    warn!("Computation for {} failed: {}", self.key, e);
                }
            }
        }

        if let Some(sender) = self.sender.take() {
            sender.send_replace(Some(outcome));
        }
    }
}

impl<V> Drop for FlightGuard<V> {
    fn drop(&mut self) {
        if self.sender.is_none() {
            return;
        }

        let mut state = self.shared.state.lock();
        state.retire(&self.key, self.id);
        state.store.stats_mut().record_failure();
        warn!("Computation for {} cancelled", self.key);
    }
}
