//! Edge cache shared across instances through Redis

use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use super::{CachedResponse, EdgeCache, EdgeCacheError, EdgeCacheResult};

const REDIS_TIMEOUT: Duration = Duration::from_secs(3);
const KEY_PREFIX: &str = "edge-cache:";

/// Wire form of a cached response; the body is base64 so the entry stays valid JSON
#[derive(Serialize, Deserialize)]
struct StoredEntry {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
}

impl From<&CachedResponse> for StoredEntry {
    fn from(response: &CachedResponse) -> Self {
        Self {
            status: response.status.as_u16(),
            headers: response.headers.clone(),
            body: STANDARD.encode(&response.body),
        }
    }
}

impl TryFrom<StoredEntry> for CachedResponse {
    type Error = EdgeCacheError;

    fn try_from(entry: StoredEntry) -> Result<Self, Self::Error> {
        let status = StatusCode::from_u16(entry.status)
            .map_err(|_| EdgeCacheError::InvalidStatus(entry.status))?;
        let body = STANDARD.decode(entry.body)?;

        Ok(Self {
            status,
            headers: entry.headers,
            body: Bytes::from(body),
        })
    }
}

/// Edge cache stored in Redis with `SET EX`
#[derive(Clone)]
pub struct RedisEdgeCache {
    connection_manager: ConnectionManager,
}

impl RedisEdgeCache {
    /// Connects to Redis with a connection manager
    ///
    /// # Errors
    /// Returns an error if:
    /// - The Redis URL is invalid
    /// - Connection to Redis server fails
    pub async fn new(url: &str) -> EdgeCacheResult<Self> {
        let client = Client::open(url)?;
        let connection_manager = ConnectionManager::new(client).await?;

        Ok(Self { connection_manager })
    }

    fn conn(&self) -> ConnectionManager {
        self.connection_manager.clone()
    }
}

#[async_trait]
impl EdgeCache for RedisEdgeCache {
    async fn lookup(&self, key: &str) -> EdgeCacheResult<Option<CachedResponse>> {
        let mut conn = self.conn();
        let raw: Option<Vec<u8>> = timeout(
            REDIS_TIMEOUT,
            conn.get::<_, Option<Vec<u8>>>(format!("{KEY_PREFIX}{key}")),
        )
        .await
        .map_err(|_| EdgeCacheError::Timeout)??;

        raw.map(|raw| {
            let entry: StoredEntry = serde_json::from_slice(&raw)?;
            CachedResponse::try_from(entry)
        })
        .transpose()
    }

    async fn store(
        &self,
        key: &str,
        response: CachedResponse,
        ttl: Duration,
    ) -> EdgeCacheResult<()> {
        let payload = serde_json::to_vec(&StoredEntry::from(&response))?;
        let ttl_secs = ttl.as_secs().max(1);

        let mut conn = self.conn();
        timeout(
            REDIS_TIMEOUT,
            conn.set_ex::<_, _, ()>(format!("{KEY_PREFIX}{key}"), payload, ttl_secs),
        )
        .await
        .map_err(|_| EdgeCacheError::Timeout)??;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderMap, HeaderValue};

    use super::*;

    #[test]
    fn stored_entry_preserves_binary_bodies() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
        let response = CachedResponse::new(
            StatusCode::OK,
            &headers,
            Bytes::from_static(&[0x89, b'P', b'N', b'G', 0x00, 0xff]),
        );

        let json = serde_json::to_vec(&StoredEntry::from(&response)).unwrap();
        let entry: StoredEntry = serde_json::from_slice(&json).unwrap();

        assert_eq!(CachedResponse::try_from(entry).unwrap(), response);
    }

    #[test]
    fn stored_entry_with_bad_status_is_rejected() {
        let entry = StoredEntry {
            status: 42,
            headers: Vec::new(),
            body: String::new(),
        };

        assert!(matches!(
            CachedResponse::try_from(entry),
            Err(EdgeCacheError::InvalidStatus(42))
        ));
    }
}
