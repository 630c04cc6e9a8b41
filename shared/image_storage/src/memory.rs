//! In-process object store

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{BucketResult, ObjectMetadata, ObjectStore, PutReceipt, StoredObject};

/// Object store kept in process memory
///
/// Used for tests and for local development without `LocalStack`. Contents
/// are lost when the process exits.
#[derive(Default)]
pub struct InMemoryImageStorage {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl InMemoryImageStorage {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects currently held
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether the store holds no objects
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for InMemoryImageStorage {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        metadata: ObjectMetadata,
    ) -> BucketResult<PutReceipt> {
        let size = body.len();
        let object = StoredObject {
            key: key.to_string(),
            body,
            metadata,
        };

        // Same-key writes overwrite, matching S3
        self.objects.write().await.insert(key.to_string(), object);
        debug!("Stored object {key} ({size} bytes) in memory");

        Ok(PutReceipt {
            key: key.to_string(),
            e_tag: None,
            size,
        })
    }

    async fn get(&self, key: &str) -> BucketResult<Option<StoredObject>> {
        Ok(self.objects.read().await.get(key).cloned())
    }
}
