//! In-process edge cache backed by `moka`

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::{future::Cache, Expiry};

use super::{CachedResponse, EdgeCache, EdgeCacheResult};

#[derive(Clone)]
struct CacheEntry {
    response: CachedResponse,
    ttl: Duration,
}

/// Expires each entry after the TTL it was stored with
struct PerEntryTtl;

impl Expiry<String, CacheEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Edge cache held in process memory, bounded by total cached body size
pub struct InMemoryEdgeCache {
    cache: Cache<String, CacheEntry>,
}

impl InMemoryEdgeCache {
    /// Creates a cache holding at most `max_bytes` of response bodies
    #[must_use]
    pub fn new(max_bytes: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_bytes)
            .weigher(|key: &String, entry: &CacheEntry| -> u32 {
                u32::try_from(key.len() + entry.response.body.len()).unwrap_or(u32::MAX)
            })
            .expire_after(PerEntryTtl)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl EdgeCache for InMemoryEdgeCache {
    async fn lookup(&self, key: &str) -> EdgeCacheResult<Option<CachedResponse>> {
        Ok(self.cache.get(key).await.map(|entry| entry.response))
    }

    async fn store(
        &self,
        key: &str,
        response: CachedResponse,
        ttl: Duration,
    ) -> EdgeCacheResult<()> {
        self.cache
            .insert(key.to_string(), CacheEntry { response, ttl })
            .await;
        Ok(())
    }
}
