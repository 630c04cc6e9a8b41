//! S3-backed object store

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::{
    error::SdkError, operation::get_object::GetObjectError, primitives::ByteStream,
    Client as S3Client,
};
use bytes::Bytes;
use tracing::{debug, error};

use crate::{
    BucketError, BucketResult, ObjectMetadata, ObjectStore, PutReceipt, StoredObject,
    DEFAULT_CONTENT_TYPE,
};

/// Image storage client for S3 operations
pub struct S3ImageStorage {
    s3_client: Arc<S3Client>,
    bucket_name: String,
}

impl S3ImageStorage {
    /// Creates a new S3 image storage client
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - S3 bucket name for image storage
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, bucket_name: String) -> Self {
        Self {
            s3_client,
            bucket_name,
        }
    }

    /// Name of the bucket objects are written to
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }
}

#[async_trait]
impl ObjectStore for S3ImageStorage {
    /// Uploads the payload with a single `PutObject` call
    ///
    /// Objects without a content type are stored as `application/octet-stream`.
    ///
    /// # Errors
    ///
    /// Returns `BucketError::UpstreamError` for 5xx responses from S3
    /// Returns `BucketError::S3Error` for other S3 service errors
    /// Returns `BucketError::AwsError` for dispatch or timeout failures
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        metadata: ObjectMetadata,
    ) -> BucketResult<PutReceipt> {
        let size = body.len();
        let custom = (!metadata.custom.is_empty()).then_some(metadata.custom);
        let content_type = metadata
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let output = self
            .s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_length(i64::try_from(size).unwrap_or(i64::MAX))
            .content_type(content_type)
            .set_metadata(custom)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                error!("Failed to put object {key}: {e}");
                BucketError::from(e)
            })?;

        debug!("Stored object {key} ({size} bytes)");

        Ok(PutReceipt {
            key: key.to_string(),
            e_tag: output.e_tag().map(ToString::to_string),
            size,
        })
    }

    /// Downloads the object and its metadata
    ///
    /// # Errors
    ///
    /// Returns `BucketError::UpstreamError` for 5xx responses from S3
    /// Returns `BucketError::S3Error` for other S3 service errors
    /// Returns `BucketError::BodyError` if the body stream fails mid-read
    async fn get(&self, key: &str) -> BucketResult<Option<StoredObject>> {
        let result = self
            .s3_client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(SdkError::ServiceError(service_err))
                if matches!(service_err.err(), GetObjectError::NoSuchKey(_))
                    || service_err.raw().status().as_u16() == 404 =>
            {
                debug!("Object does not exist: {key}");
                return Ok(None);
            }
            Err(e) => {
                error!("Failed to get object {key}: {e}");
                return Err(BucketError::from(e));
            }
        };

        let metadata = ObjectMetadata {
            content_type: output.content_type().map(ToString::to_string),
            custom: output.metadata().cloned().unwrap_or_default(),
        };
        let body = output
            .body
            .collect()
            .await
            .map_err(|e| BucketError::BodyError(e.to_string()))?
            .into_bytes();

        Ok(Some(StoredObject {
            key: key.to_string(),
            body,
            metadata,
        }))
    }
}
