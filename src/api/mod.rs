//! API Module
//!
//! HTTP handlers and routing for inspecting and operating the named caches.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /caches` - List cache names
//! - `GET /caches/:name/stats` - Cache statistics
//! - `GET|PUT|DELETE /caches/:name/entries/:key` - Entry operations
//! - `DELETE /caches/:name` - Clear a cache

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
