//! API Handlers
//!
//! HTTP request handlers for inspecting and operating the named caches.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::{CacheRegistry, CacheStats, CacheStore};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, CachesResponse, ClearResponse, GetResponse, HealthResponse, KeyResponse,
    SetRequest,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The named caches
    pub caches: CacheRegistry,
}

impl AppState {
    /// Creates a new AppState over the given registry.
    pub fn new(caches: CacheRegistry) -> Self {
        Self { caches }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the cache registry with parameters from the Config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheRegistry::from_config(config))
    }

    fn cache(&self, name: &str) -> Result<&Arc<CacheStore<Value>>> {
        self.caches
            .get(name)
            .ok_or_else(|| CacheError::UnknownCache(name.to_string()))
    }
}

fn checked_key(key: String) -> Result<String> {
    match validate_key(&key) {
        Some(error_msg) => Err(CacheError::InvalidRequest(error_msg)),
        None => Ok(key),
    }
}

/// Handler for GET /caches
pub async fn list_handler(State(state): State<AppState>) -> Json<CachesResponse> {
    let caches = state.caches.names().into_iter().map(String::from).collect();
    Json(CachesResponse { caches })
}

/// Handler for PUT /caches/:name/entries/:key
///
/// Stores a JSON value with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Path((name, key)): Path<(String, String)>,
    Json(req): Json<SetRequest>,
) -> Result<Json<KeyResponse>> {
    let key = checked_key(key)?;
    let cache = state.cache(&name)?;

    cache.set_with_ttl(key.clone(), req.value, req.ttl_ms.map(Duration::from_millis));

    Ok(Json(KeyResponse::set(key)))
}

/// Handler for GET /caches/:name/entries/:key
///
/// Counts as a read: bumps hits and restarts the entry's TTL window.
pub async fn get_handler(
    State(state): State<AppState>,
    Path((name, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    let key = checked_key(key)?;
    let cache = state.cache(&name)?;
    let value = cache
        .get(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /caches/:name/entries/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((name, key)): Path<(String, String)>,
) -> Result<Json<KeyResponse>> {
    let key = checked_key(key)?;
    let cache = state.cache(&name)?;
    if !cache.delete(&key) {
        return Err(CacheError::NotFound(key));
    }

    Ok(Json(KeyResponse::deleted(key)))
}

/// Handler for DELETE /caches/:name
pub async fn clear_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ClearResponse>> {
    let cleared = state.cache(&name)?.clear();

    Ok(Json(ClearResponse {
        cache: name,
        cleared,
    }))
}

/// Handler for GET /caches/:name/stats
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CacheStats>> {
    Ok(Json(state.cache(&name)?.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
