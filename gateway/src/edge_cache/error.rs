//! Error types for edge cache operations

use thiserror::Error;

/// Result type for edge cache operations
pub type EdgeCacheResult<T> = Result<T, EdgeCacheError>;

/// Errors that can occur while reading or writing the edge cache
#[derive(Error, Debug)]
pub enum EdgeCacheError {
    /// Redis did not answer in time
    #[error("Redis timeout")]
    Timeout,

    /// Redis returned an error
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A cache entry could not be encoded or decoded
    #[error("Invalid cache entry: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A cached body was not valid base64
    #[error("Invalid cached body: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// A cached status code was out of range
    #[error("Invalid cached status: {0}")]
    InvalidStatus(u16),
}
