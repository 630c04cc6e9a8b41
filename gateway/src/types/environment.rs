//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};

/// Default in-memory edge cache capacity: 256 MiB of response bodies
const DEFAULT_EDGE_CACHE_MAX_BYTES: u64 = 256 * 1024 * 1024;
/// Default request body limit: 100 MiB
const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PORT: u16 = 8001;

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack` unless in-memory storage is selected)
    Development {
        /// Keep uploads in process memory instead of S3
        in_memory_storage: bool,
    },
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => {
                let in_memory_storage = env::var("IMAGE_STORAGE")
                    .is_ok_and(|val| val.trim().eq_ignore_ascii_case("memory"));

                Self::Development { in_memory_storage }
            }
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the S3 bucket name for the environment
    ///
    /// # Panics
    ///
    /// Panics if the `S3_BUCKET_NAME` environment variable is not set outside development
    #[must_use]
    pub fn s3_bucket(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("S3_BUCKET_NAME").expect("S3_BUCKET_NAME environment variable is not set")
            }
            Self::Development { .. } => {
                env::var("S3_BUCKET_NAME").unwrap_or_else(|_| "image-gateway".to_string())
            }
        }
    }

    /// Whether uploads are kept in process memory instead of S3
    #[must_use]
    pub const fn in_memory_storage(&self) -> bool {
        matches!(
            self,
            Self::Development {
                in_memory_storage: true
            }
        )
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development { .. } => Some("http://localhost:4566"),
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Override "force path style" to true for compatibility with LocalStack
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if matches!(self, Self::Development { .. }) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }

    /// Redis URL for the shared edge cache, if configured
    #[must_use]
    pub fn redis_url(&self) -> Option<String> {
        env::var("REDIS_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
    }

    /// Capacity of the in-memory edge cache in bytes of cached bodies
    #[must_use]
    pub fn edge_cache_max_bytes(&self) -> u64 {
        env_or("EDGE_CACHE_MAX_BYTES", DEFAULT_EDGE_CACHE_MAX_BYTES)
    }

    /// Maximum accepted request body size in bytes
    #[must_use]
    pub fn max_upload_bytes(&self) -> usize {
        env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)
    }

    /// Per-request timeout applied by the server
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(env_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    /// Port the server listens on
    #[must_use]
    pub fn port(&self) -> u16 {
        env_or("PORT", DEFAULT_PORT)
    }

    /// Whether logs should be emitted as JSON
    #[must_use]
    pub const fn json_logs(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Parses an environment variable, falling back to `default` when unset or invalid
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|val| val.trim().parse::<T>().ok())
        .unwrap_or(default)
}
