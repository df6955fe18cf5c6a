//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the caches, the cached fetcher and the inspection API.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found (or expired) in a cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// No cache registered under the given name
    #[error("Unknown cache: {0}")]
    UnknownCache(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    Http {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Request could not be sent or the body could not be read
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Body was not the expected JSON shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) | CacheError::UnknownCache(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Http { .. } | CacheError::Transport(_) => StatusCode::BAD_GATEWAY,
            CacheError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;
