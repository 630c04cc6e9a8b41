//! HTTP routes of the gateway

mod form;
mod health;
mod images;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Creates the router with all handler routes
pub fn handler() -> Router<AppState> {
    Router::new()
        .route("/", get(form::render_form))
        .route("/image", post(images::upload_image))
        .route("/image/{id}", get(images::fetch_image))
        .route("/health", get(health::handler))
}
