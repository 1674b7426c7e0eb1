//! Cache Module
//!
//! Read-through caching of async computations with single-flight, TTL
//! expiration and LRU eviction.

mod config;
mod entry;
mod key;
mod read_through;
mod stats;
mod store;


// Re-export public types
pub use config::{CacheConfig, DEFAULT_CACHE_NAME};
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use read_through::ReadThroughCache;
pub use stats::CacheStats;
pub use store::CacheStore;
