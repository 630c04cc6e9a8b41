//! Server startup and router assembly

use axum::{extract::DefaultBodyLimit, Router};
use datadog_tracing::axum::{shutdown_signal, OtelAxumLayer, OtelInResponseLayer};
use tokio::net::TcpListener;

use crate::{routes, state::AppState, types::Environment};

/// Builds the application router with its state and body limit
///
/// `max_upload_bytes` bounds every request body, uploads included.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    routes::handler()
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(environment: Environment, state: AppState) -> anyhow::Result<()> {
    let router = router(state, environment.max_upload_bytes())
        // Include trace context as header into the response
        .layer(OtelInResponseLayer)
        // Start OpenTelemetry trace on incoming request
        .layer(OtelAxumLayer::default())
        .layer(tower_http::timeout::TimeoutLayer::new(
            environment.request_timeout(),
        ));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], environment.port()));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🔄 Image Gateway started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}
