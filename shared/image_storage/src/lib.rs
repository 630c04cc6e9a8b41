//! Object storage for uploaded images
//!
//! This crate provides the blob store the image gateway writes uploads into and
//! serves them back from. Objects are immutable once written: there is no
//! update or delete operation.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

mod error;
mod memory;
mod s3;

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;

pub use error::{BucketError, BucketResult};
pub use memory::InMemoryImageStorage;
pub use s3::S3ImageStorage;

/// Content type recorded for objects uploaded without one
///
/// S3 would otherwise answer `binary/octet-stream` for them.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// HTTP and user metadata attached to a stored object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// MIME type declared at upload time
    pub content_type: Option<String>,
    /// Flat string-to-string user metadata
    pub custom: HashMap<String, String>,
}

impl ObjectMetadata {
    /// Looks up a custom metadata value by name, ignoring ASCII case
    ///
    /// S3 lower-cases user metadata keys, so `lastModified` comes back as
    /// `lastmodified`.
    #[must_use]
    pub fn custom_value(&self, name: &str) -> Option<&str> {
        self.custom
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An object read back from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object key
    pub key: String,
    /// Raw payload
    pub body: Bytes,
    /// Metadata recorded at write time
    pub metadata: ObjectMetadata,
}

/// Acknowledgement returned by a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutReceipt {
    /// Object key
    pub key: String,
    /// Entity tag reported by the store, if any
    pub e_tag: Option<String>,
    /// Number of bytes written
    pub size: usize,
}

/// Key-value blob storage with per-object metadata
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes `body` under `key` with the given metadata
    ///
    /// # Errors
    ///
    /// Returns a `BucketError` if the store rejects or fails the write
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        metadata: ObjectMetadata,
    ) -> BucketResult<PutReceipt>;

    /// Reads the object stored under `key`
    ///
    /// Returns `Ok(None)` when no object exists under `key`.
    ///
    /// # Errors
    ///
    /// Returns a `BucketError` if the store fails the read
    async fn get(&self, key: &str) -> BucketResult<Option<StoredObject>>;
}
