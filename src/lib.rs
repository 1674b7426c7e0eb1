//! Read-Through Cache - memoization of expensive async calls
//!
//! Provides a read-through cache with single-flight deduplication, TTL
//! expiration and LRU eviction, plus a small greeting service and HTTP API
//! that demonstrate it.

pub mod api;
pub mod cache;
pub mod config;
pub mod demo;
pub mod error;
pub mod greeter;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheConfig, ReadThroughCache};
pub use config::Config;
pub use error::CacheError;
pub use tasks::spawn_cleanup_task;
