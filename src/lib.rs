//! Mood Cache - In-memory caches for the mood tracker
//!
//! Size-bounded, TTL-expiring key/value stores with eviction notification,
//! read-through helpers, a cached JSON fetcher and an HTTP inspection API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheOptions, CacheRegistry, CacheStore};
pub use config::Config;
pub use error::CacheError;
pub use fetch::{CachedFetch, FetchOptions};
