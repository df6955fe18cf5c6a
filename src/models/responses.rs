//! Response DTOs for the cache inspection API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

/// Response body for reading an entry (GET /caches/:name/entries/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: Value,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for mutations on a single key (PUT / DELETE)
#[derive(Debug, Clone, Serialize)]
pub struct KeyResponse {
    /// Success message
    pub message: String,
    /// The key that was touched
    pub key: String,
}

impl KeyResponse {
    /// Response for a stored key
    pub fn set(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }

    /// Response for a deleted key
    pub fn deleted(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for clearing a cache (DELETE /caches/:name)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// The cache that was cleared
    pub cache: String,
    /// Number of entries removed
    pub cleared: usize,
}

/// Response body for listing caches (GET /caches)
#[derive(Debug, Clone, Serialize)]
pub struct CachesResponse {
    pub caches: Vec<String>,
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
