//! Request-keyed response cache in front of the object store
//!
//! Fetch responses are looked up by request before the object store is
//! consulted. Population is write-through: after a successful store read the
//! handler stores the response here when its own `Cache-Control` header allows
//! shared caching, for `max-age` seconds.

mod error;
mod memory;
mod redis_cache;

use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

pub use error::{EdgeCacheError, EdgeCacheResult};
pub use memory::InMemoryEdgeCache;
pub use redis_cache::RedisEdgeCache;

/// A response captured for replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    /// Status code of the original response
    pub status: StatusCode,
    /// Headers in the order they were sent
    pub headers: Vec<(String, String)>,
    /// Full response body
    pub body: Bytes,
}

impl CachedResponse {
    /// Captures status, headers and body of a response about to be sent
    ///
    /// Header values that are not visible ASCII are dropped.
    #[must_use]
    pub fn new(status: StatusCode, headers: &HeaderMap, body: Bytes) -> Self {
        let headers = headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        Self {
            status,
            headers,
            body,
        }
    }
}

impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        for (name, value) in self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::try_from(name),
                HeaderValue::try_from(value),
            ) {
                headers.append(name, value);
            }
        }

        response
    }
}

/// Response cache keyed by request
#[async_trait]
pub trait EdgeCache: Send + Sync {
    /// Returns the cached response for `key`, if any
    ///
    /// # Errors
    ///
    /// Returns an `EdgeCacheError` if the backing cache cannot be read
    async fn lookup(&self, key: &str) -> EdgeCacheResult<Option<CachedResponse>>;

    /// Stores `response` under `key` for `ttl`
    ///
    /// # Errors
    ///
    /// Returns an `EdgeCacheError` if the backing cache cannot be written
    async fn store(&self, key: &str, response: CachedResponse, ttl: Duration)
        -> EdgeCacheResult<()>;
}

/// Builds the cache key for a request from its method, host and path
///
/// Two requests that would be routed identically map to the same key.
#[must_use]
pub fn cache_key(method: &Method, uri: &Uri, headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| uri.authority().map(axum::http::uri::Authority::as_str))
        .unwrap_or_default()
        .to_ascii_lowercase();
    let path = uri
        .path_and_query()
        .map_or_else(|| uri.path(), axum::http::uri::PathAndQuery::as_str);

    format!("{method} {host}{path}")
}

/// How long a shared cache may keep a response, according to its `Cache-Control` header
///
/// Returns `None` when the response must not be stored: no `Cache-Control`,
/// `private`, `no-store` or `no-cache`, or no positive `max-age`/`s-maxage`.
/// `s-maxage` takes precedence over `max-age`.
#[must_use]
pub fn shared_cache_ttl(headers: &HeaderMap) -> Option<Duration> {
    let cache_control = headers.get(header::CACHE_CONTROL)?.to_str().ok()?;

    let mut max_age = None;
    let mut s_maxage = None;

    for directive in cache_control.split(',') {
        let directive = directive.trim().to_ascii_lowercase();
        let (name, value) = directive
            .split_once('=')
            .map_or((directive.as_str(), None), |(name, value)| {
                (name.trim(), Some(value.trim().trim_matches('"')))
            });

        match name {
            "private" | "no-store" | "no-cache" => return None,
            "max-age" => max_age = value.and_then(|v| v.parse::<u64>().ok()),
            "s-maxage" => s_maxage = value.and_then(|v| v.parse::<u64>().ok()),
            _ => {}
        }
    }

    s_maxage
        .or(max_age)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
