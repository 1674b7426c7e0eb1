//! Response DTOs for the HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for GET /greet/:name
#[derive(Debug, Clone, Serialize)]
pub struct GreetResponse {
    /// The greeted name
    pub name: String,
    /// The (possibly cached) greeting
    pub greeting: String,
}

impl GreetResponse {
    pub fn new(name: impl Into<String>, greeting: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            greeting: greeting.into(),
        }
    }
}

/// Response body for the invalidation endpoints
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Human-readable outcome
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl InvalidateResponse {
    /// Outcome of invalidating one name.
    pub fn single(name: &str, removed: bool) -> Self {
        let message = if removed {
            format!("Greeting for '{}' invalidated", name)
        } else {
            format!("No cached greeting for '{}'", name)
        };
        Self {
            message,
            removed: usize::from(removed),
        }
    }

    /// Outcome of clearing the whole cache.
    pub fn all(removed: usize) -> Self {
        Self {
            message: format!("Invalidated {} cached greetings", removed),
            removed,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Cache namespace
    pub cache_name: String,
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / lookups)
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(cache_name: impl Into<String>, stats: &CacheStats) -> Self {
        Self {
            cache_name: cache_name.into(),
            stats: stats.clone(),
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
