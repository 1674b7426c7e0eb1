//! Response models for the HTTP API
//!
//! This module defines the DTOs serialized into HTTP response bodies.
//! Errors are rendered by `CacheError`'s `IntoResponse` impl.

pub mod responses;

pub use responses::{GreetResponse, HealthResponse, InvalidateResponse, StatsResponse};
