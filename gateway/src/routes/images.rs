use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use chrono::SecondsFormat;
use image_storage::{ObjectMetadata, DEFAULT_CONTENT_TYPE};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    edge_cache::{cache_key, shared_cache_ttl, CachedResponse},
    state::AppState,
    types::{AppError, ImageUpload},
};

/// Custom metadata key holding the upload's modification time
pub const LAST_MODIFIED_METADATA_KEY: &str = "lastModified";

/// Identifiers are never reused and objects never change, so responses may be cached forever
const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Stores an uploaded file under a fresh identifier and redirects to its preview
#[instrument(
    skip(state, upload),
    fields(file_name = %upload.file_name, size = upload.bytes.len())
)]
pub async fn upload_image(
    State(state): State<AppState>,
    upload: ImageUpload,
) -> Result<Response, AppError> {
    let image_id = Uuid::new_v4().to_string();

    let metadata = ObjectMetadata {
        content_type: Some(
            upload
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        ),
        custom: HashMap::from([(
            LAST_MODIFIED_METADATA_KEY.to_string(),
            upload
                .last_modified
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        )]),
    };

    state
        .image_storage
        .put(&image_id, upload.bytes, metadata)
        .await
        .map_err(|e| {
            error!("Failed to store image {image_id}: {e}");
            AppError::upload_failed()
        })?;

    info!("Stored image {image_id}");

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, format!("/?image={image_id}"))],
    )
        .into_response())
}

/// Serves a stored image, consulting the edge cache first
#[instrument(skip(state, method, uri, headers))]
pub async fn fetch_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let key = cache_key(&method, &uri, &headers);

    match state.edge_cache.lookup(&key).await {
        Ok(Some(cached)) => {
            debug!("Edge cache hit for {key}");
            return Ok(cached.into_response());
        }
        Ok(None) => debug!("Edge cache miss for {key}"),
        Err(e) => warn!("Edge cache lookup failed for {key}: {e}"),
    }

    let image = state
        .image_storage
        .get(&id)
        .await
        .map_err(|e| {
            error!("Failed to read image {id}: {e}");
            AppError::fetch_failed()
        })?
        .ok_or_else(AppError::image_not_found)?;

    let content_type = image
        .metadata
        .content_type
        .as_deref()
        .and_then(|value| HeaderValue::from_str(value).ok())
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    let mut response_headers = HeaderMap::new();
    response_headers.insert(header::CONTENT_TYPE, content_type);
    response_headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(IMMUTABLE_CACHE_CONTROL),
    );
    if let Some(last_modified) = image
        .metadata
        .custom_value(LAST_MODIFIED_METADATA_KEY)
        .and_then(|value| HeaderValue::from_str(value).ok())
    {
        response_headers.insert(header::LAST_MODIFIED, last_modified);
    }

    if let Some(ttl) = shared_cache_ttl(&response_headers) {
        let cached = CachedResponse::new(StatusCode::OK, &response_headers, image.body.clone());
        if let Err(e) = state.edge_cache.store(&key, cached, ttl).await {
            warn!("Failed to populate edge cache for {key}: {e}");
        }
    }

    let mut response = Response::new(Body::from(image.body));
    *response.headers_mut() = response_headers;

    Ok(response)
}
