use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response, Router};
use image_gateway::{
    edge_cache::{EdgeCache, InMemoryEdgeCache},
    server,
    state::AppState,
};
use image_storage::ObjectStore;
use tower::ServiceExt;

use super::{multipart_body, CountingStore, Part, BOUNDARY};

const TEST_MAX_UPLOAD_BYTES: usize = 1024 * 1024;
const TEST_EDGE_CACHE_MAX_BYTES: u64 = 16 * 1024 * 1024;

/// Setup test environment variables with all the required configuration
pub fn setup_test_env() {
    // Load test environment variables
    dotenvy::from_path(".env.example").ok();

    // Initialize tracing for tests
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Router wired to in-process collaborators
pub struct TestSetup {
    pub router: Router,
    pub image_storage: Arc<CountingStore>,
    pub edge_cache: Arc<InMemoryEdgeCache>,
}

impl TestSetup {
    pub fn new() -> Self {
        setup_test_env();

        let image_storage = Arc::new(CountingStore::default());
        let edge_cache = Arc::new(InMemoryEdgeCache::new(TEST_EDGE_CACHE_MAX_BYTES));

        let router = build_router(image_storage.clone(), edge_cache.clone());

        Self {
            router,
            image_storage,
            edge_cache,
        }
    }

    pub async fn send_request(
        &self,
        request: Request<Body>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .header("Host", "images.test")
            .body(Body::empty())?;
        self.send_request(request).await
    }

    pub async fn send_multipart_request(
        &self,
        route: &str,
        parts: &[Part<'_>],
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))?;
        self.send_request(request).await
    }

    /// Upload `data` as the `image` file field
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_multipart_request(
            "/image",
            &[Part::File {
                name: "image",
                file_name,
                content_type: Some(content_type),
                data,
            }],
        )
        .await
    }
}

/// Build the application router over arbitrary collaborators
pub fn build_router(
    image_storage: Arc<dyn ObjectStore>,
    edge_cache: Arc<dyn EdgeCache>,
) -> Router {
    server::router(
        AppState::new(image_storage, edge_cache),
        TEST_MAX_UPLOAD_BYTES,
    )
}
