//! Universal error handling for the gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// JSON error body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: &'static str,
}

/// Application error type that wraps the error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: ErrorResponse,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub const fn new(status: StatusCode, message: &'static str) -> Self {
        Self {
            status,
            inner: ErrorResponse { error: message },
        }
    }

    /// The upload form failed validation
    #[must_use]
    pub const fn validation(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// The object store did not accept the upload
    #[must_use]
    pub const fn upload_failed() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to upload image")
    }

    /// No object exists under the requested identifier
    #[must_use]
    pub const fn image_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Image not found")
    }

    /// The object store failed while reading an image
    #[must_use]
    pub const fn fetch_failed() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch image")
    }

    /// HTTP status this error maps to
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Message carried in the `error` field
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.inner.error
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!("Client error: {} - {}", self.status, self.inner.error),
            500..=599 => tracing::error!("Server error: {} - {}", self.status, self.inner.error),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}
