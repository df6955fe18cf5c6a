//! Request DTOs for the cache inspection API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::MAX_KEY_LENGTH;

/// Request body for storing an entry (PUT /caches/:name/entries/:key)
///
/// # Fields
/// - `value`: Any JSON value to store
/// - `ttl_ms`: Optional TTL in milliseconds (uses the cache default if not specified)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The value to store
    pub value: Value,
    /// Optional TTL in milliseconds
    #[serde(default)]
    pub ttl_ms: Option<u64>,
}

/// Validates a cache key taken from the request path.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}
