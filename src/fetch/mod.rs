//! Cached Fetch Module
//!
//! Wraps JSON HTTP requests so repeated GETs are served from a cache.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::cache::CacheStore;
use crate::error::{CacheError, Result};

// == Fetch Options ==
/// Per-request options for [`CachedFetch::fetch`].
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// HTTP method; `None` means GET
    pub method: Option<Method>,
    /// Overrides the derived `"{METHOD}:{url}"` cache key
    pub cache_key: Option<String>,
    /// Overrides the cache's default TTL
    pub ttl: Option<Duration>,
    /// JSON request body
    pub body: Option<Value>,
}

impl FetchOptions {
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

// == Cached Fetch ==
/// JSON HTTP client backed by a cache of decoded response bodies.
///
/// GET requests go through [`CacheStore::get_or_set`]; any other method
/// always hits the network. Non-2xx responses are returned as
/// [`CacheError::Http`] and never cached.
#[derive(Debug, Clone)]
pub struct CachedFetch {
    client: Client,
    cache: Arc<CacheStore<Value>>,
}

impl CachedFetch {
    pub fn new(cache: Arc<CacheStore<Value>>) -> Self {
        Self::with_client(Client::new(), cache)
    }

    pub fn with_client(client: Client, cache: Arc<CacheStore<Value>>) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> &Arc<CacheStore<Value>> {
        &self.cache
    }

    // == Fetch ==
    /// Performs the request, answering GETs from the cache when possible.
    pub async fn fetch(&self, url: &str, options: FetchOptions) -> Result<Value> {
        let method = options.method.clone().unwrap_or(Method::GET);

        if method != Method::GET {
            return self.send(method, url, options.body).await;
        }

        let key = options
            .cache_key
            .clone()
            .unwrap_or_else(|| cache_key(&method, url));

        self.cache
            .get_or_set(
                &key,
                || {
                    debug!(cache = %self.cache.name(), %key, "cache miss, fetching");
                    self.send(method, url, options.body)
                },
                options.ttl,
            )
            .await
    }

    /// [`fetch`](Self::fetch) and decode the body into `T`.
    pub async fn fetch_as<T: DeserializeOwned>(&self, url: &str, options: FetchOptions) -> Result<T> {
        let value = self.fetch(url, options).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn send(&self, method: Method, url: &str, body: Option<Value>) -> Result<Value> {
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Http {
                status,
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Default cache key for a request.
pub fn cache_key(method: &Method, url: &str) -> String {
    format!("{}:{}", method, url)
}
