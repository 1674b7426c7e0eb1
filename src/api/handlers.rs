//! API Handlers
//!
//! HTTP request handlers for the cached greeting service.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::CacheConfig;
use crate::config::Config;
use crate::error::Result;
use crate::greeter::{CachedGreeter, SlowGreeter};
use crate::models::{GreetResponse, HealthResponse, InvalidateResponse, StatsResponse};

/// Application state shared across all handlers.
///
/// `CachedGreeter` is a cheap handle over shared cache state, so cloning the
/// state per request shares one cache.
#[derive(Clone, Debug)]
pub struct AppState {
    pub greeter: CachedGreeter,
}

impl AppState {
    pub fn new(greeter: CachedGreeter) -> Self {
        Self { greeter }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_cache(SlowGreeter::new(config.greet_delay()), config.cache_config())
    }

    pub fn with_cache(greeter: SlowGreeter, cache: CacheConfig) -> Self {
        Self::new(CachedGreeter::new(greeter, cache))
    }
}

/// Handler for GET /greet/:name
///
/// Returns the greeting for `name`, computing it only on a cache miss.
pub async fn greet_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<GreetResponse>> {
    let greeting = state.greeter.greet(&name).await?;
    Ok(Json(GreetResponse::new(name, greeting)))
}

/// Handler for DELETE /cache/greet/:name
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<InvalidateResponse>> {
    let removed = state.greeter.forget(&name)?;
    Ok(Json(InvalidateResponse::single(&name, removed)))
}

/// Handler for DELETE /cache
pub async fn invalidate_all_handler(State(state): State<AppState>) -> Json<InvalidateResponse> {
    let removed = state.greeter.forget_all();
    Json(InvalidateResponse::all(removed))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.greeter.cache();
    Json(StatsResponse::new(cache.name(), &cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
