use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use image_gateway::{
    edge_cache::{EdgeCache, InMemoryEdgeCache, RedisEdgeCache},
    server,
    state::AppState,
    types::Environment,
};
use image_storage::{InMemoryImageStorage, ObjectStore, S3ImageStorage};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    // Configure logging format based on environment
    // Use JSON format for staging/production (Datadog), regular format for development
    if environment.json_logs() {
        fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    } else {
        fmt().with_env_filter(EnvFilter::from_default_env()).init();
    }

    let image_storage: Arc<dyn ObjectStore> = if environment.in_memory_storage() {
        tracing::warn!("Using in-memory image storage; uploads are lost on restart");
        Arc::new(InMemoryImageStorage::new())
    } else {
        let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
        Arc::new(S3ImageStorage::new(s3_client, environment.s3_bucket()))
    };

    let edge_cache: Arc<dyn EdgeCache> = match environment.redis_url() {
        Some(url) => {
            tracing::info!("Using Redis edge cache");
            Arc::new(RedisEdgeCache::new(&url).await?)
        }
        None => Arc::new(InMemoryEdgeCache::new(environment.edge_cache_max_bytes())),
    };

    server::start(environment, AppState::new(image_storage, edge_cache)).await
}
