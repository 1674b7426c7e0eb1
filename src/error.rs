//! Error types for the read-through cache
//!
//! Provides unified error handling using thiserror. Errors are `Clone` so a
//! single computation outcome can be handed to every caller waiting on it.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache and the services built on it.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// The wrapped computation returned an error. Never cached.
    #[error("Computation failed for {key}: {cause}")]
    ComputationFailed {
        key: String,
        cause: Arc<anyhow::Error>,
    },

    /// Call arguments could not be encoded into a cache key
    #[error("Invalid key derivation: {0}")]
    InvalidKeyDerivation(String),

    /// The computation was dropped before producing a value
    #[error("Computation cancelled: {0}")]
    Cancelled(String),

    /// The computation exceeded the configured deadline
    #[error("Computation for {key} timed out after {after:?}")]
    TimedOut { key: String, after: Duration },

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CacheError {
    /// Wraps a computation error for the given key.
    pub fn computation_failed(key: impl Into<String>, cause: anyhow::Error) -> Self {
        CacheError::ComputationFailed {
            key: key.into(),
            cause: Arc::new(cause),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidRequest(_) | CacheError::InvalidKeyDerivation(_) => {
                StatusCode::BAD_REQUEST
            }
            CacheError::ComputationFailed { .. } => StatusCode::BAD_GATEWAY,
            CacheError::TimedOut { .. } => StatusCode::GATEWAY_TIMEOUT,
            CacheError::Cancelled(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
