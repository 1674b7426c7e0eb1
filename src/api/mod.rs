//! API Module
//!
//! HTTP handlers and routing for the cached greeting service.
//!
//! # Endpoints
//! - `GET /greet/:name` - Cached greeting
//! - `DELETE /cache/greet/:name` - Invalidate one greeting
//! - `DELETE /cache` - Invalidate every greeting
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
