//! Cache Registry
//!
//! Composition root for the application's named caches. One registry is
//! built at startup and handed to whatever needs a cache.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::info;

use crate::cache::{CacheOptions, CacheStore};
use crate::config::Config;

/// Short-lived responses from the app's own API
pub const API_CACHE: &str = "api";
/// Per-user profile and settings data
pub const USER_DATA_CACHE: &str = "user_data";
/// Long-lived reference data (prompts, plans, copy)
pub const STATIC_CACHE: &str = "static";

// == Cache Registry ==
/// The three named JSON caches.
#[derive(Debug, Clone)]
pub struct CacheRegistry {
    pub api: Arc<CacheStore<Value>>,
    pub user_data: Arc<CacheStore<Value>>,
    pub static_data: Arc<CacheStore<Value>>,
}

impl CacheRegistry {
    /// Builds the registry from already-configured stores.
    pub fn new(api: CacheStore<Value>, user_data: CacheStore<Value>, static_data: CacheStore<Value>) -> Self {
        Self {
            api: Arc::new(api),
            user_data: Arc::new(user_data),
            static_data: Arc::new(static_data),
        }
    }

    /// Builds the three stores with the sizes and lifetimes from `config`.
    /// Sweepers are not started; see [`start_sweepers`](Self::start_sweepers).
    pub fn from_config(config: &Config) -> Self {
        let build = |name: &str, ttl_secs: u64, max_size: usize| -> CacheStore<Value> {
            CacheStore::new(
                CacheOptions::named(name)
                    .ttl(Duration::from_secs(ttl_secs))
                    .max_size(max_size)
                    .sweep_interval(config.sweep_interval()),
            )
        };

        Self::new(
            build(API_CACHE, config.api_cache.ttl_secs, config.api_cache.max_size),
            build(USER_DATA_CACHE, config.user_data_cache.ttl_secs, config.user_data_cache.max_size),
            build(STATIC_CACHE, config.static_cache.ttl_secs, config.static_cache.max_size),
        )
    }

    // == Lookup ==
    /// Returns the cache registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Arc<CacheStore<Value>>> {
        match name {
            API_CACHE => Some(&self.api),
            USER_DATA_CACHE => Some(&self.user_data),
            STATIC_CACHE => Some(&self.static_data),
            _ => None,
        }
    }

    /// Names of all registered caches.
    pub fn names(&self) -> Vec<&str> {
        self.all().into_iter().map(|store| store.name()).collect()
    }

    fn all(&self) -> [&Arc<CacheStore<Value>>; 3] {
        [&self.api, &self.user_data, &self.static_data]
    }

    // == Lifecycle ==
    /// Starts the background sweeper of every cache.
    pub fn start_sweepers(&self) {
        for store in self.all() {
            store.start_sweeper();
            info!(cache = %store.name(), "sweeper started");
        }
    }

    /// Stops every sweeper. Cached entries stay readable.
    pub fn dispose(&self) {
        for store in self.all() {
            store.dispose();
        }
        info!("all cache sweepers stopped");
    }
}
