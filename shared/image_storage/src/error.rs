//! Error types for object store operations

use aws_sdk_s3::{
    error::SdkError,
    operation::{get_object::GetObjectError, put_object::PutObjectError},
};
use thiserror::Error;

/// Result type for bucket operations
pub type BucketResult<T> = Result<T, BucketError>;

/// Errors that can occur during bucket operations
#[derive(Error, Debug)]
pub enum BucketError {
    /// S3 service error
    #[error("S3 service error: {0}")]
    S3Error(String),

    /// AWS SDK error (dispatch, timeout, credentials)
    #[error("AWS SDK error: {0}")]
    AwsError(String),

    /// Upstream service error (5xx from S3)
    #[error("Upstream service error: {0}")]
    UpstreamError(String),

    /// The object body could not be read to completion
    #[error("Failed to read object body: {0}")]
    BodyError(String),
}

impl From<SdkError<PutObjectError>> for BucketError {
    fn from(error: SdkError<PutObjectError>) -> Self {
        match error {
            SdkError::ServiceError(err) if err.raw().status().as_u16() >= 500 => {
                Self::UpstreamError(format!("{:?}", err.err()))
            }
            SdkError::ServiceError(err) => Self::S3Error(format!("{:?}", err.err())),
            _ => Self::AwsError(error.to_string()),
        }
    }
}

impl From<SdkError<GetObjectError>> for BucketError {
    fn from(error: SdkError<GetObjectError>) -> Self {
        match error {
            SdkError::ServiceError(err) if err.raw().status().as_u16() >= 500 => {
                Self::UpstreamError(format!("{:?}", err.err()))
            }
            SdkError::ServiceError(err) => Self::S3Error(format!("{:?}", err.err())),
            _ => Self::AwsError(error.to_string()),
        }
    }
}
