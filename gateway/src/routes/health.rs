use axum::Json;
use serde::Serialize;

/// Liveness payload of the image gateway
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `ok` while the process can serve requests
    status: String,
    /// Current version of the application
    semver: String,
    /// Commit hash of the current build (if available)
    rev: Option<String>,
}

/// Health check endpoint
///
/// Returns the current status and version information of the service.
/// Neither the object store nor the edge cache is contacted.
#[allow(clippy::unused_async)]
pub async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        semver: env!("CARGO_PKG_VERSION").to_string(),
        rev: option_env!("GIT_REV").map(ToString::to_string),
    })
}
