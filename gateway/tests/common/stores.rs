use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use image_storage::{
    BucketError, BucketResult, InMemoryImageStorage, ObjectMetadata, ObjectStore, PutReceipt,
    StoredObject,
};

/// In-memory store that counts how often it is read
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryImageStorage,
    gets: AtomicUsize,
}

impl CountingStore {
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for CountingStore {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        metadata: ObjectMetadata,
    ) -> BucketResult<PutReceipt> {
        self.inner.put(key, body, metadata).await
    }

    async fn get(&self, key: &str) -> BucketResult<Option<StoredObject>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }
}

/// Store whose every call fails like an S3 outage
pub struct FailingStore;

#[async_trait]
impl ObjectStore for FailingStore {
    async fn put(&self, _key: &str, _body: Bytes, _metadata: ObjectMetadata) -> BucketResult<PutReceipt> {
        Err(BucketError::UpstreamError("service unavailable".to_string()))
    }

    async fn get(&self, _key: &str) -> BucketResult<Option<StoredObject>> {
        Err(BucketError::UpstreamError("service unavailable".to_string()))
    }
}
