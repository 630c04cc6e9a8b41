//! Custom extractors for request validation

use axum::{
    extract::{multipart::MultipartError, FromRequest, Multipart, Request},
    http::StatusCode,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::types::error::AppError;

/// Name of the multipart file field carrying the image
pub const IMAGE_FIELD: &str = "image";
/// Name of the optional multipart text field carrying the client's modification time
pub const LAST_MODIFIED_FIELD: &str = "lastModified";

/// A validated image upload parsed from a `multipart/form-data` body
///
/// The `image` part must be file-shaped, i.e. carry a `filename` in its
/// `Content-Disposition`. Size and MIME type are not checked.
#[derive(Debug)]
pub struct ImageUpload {
    /// Client-supplied file name
    pub file_name: String,
    /// MIME type declared on the file part
    pub content_type: Option<String>,
    /// Raw file bytes
    pub bytes: Bytes,
    /// Client-reported modification time, or the receive time when absent
    pub last_modified: DateTime<Utc>,
}

impl<S> FromRequest<S> for ImageUpload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await.map_err(|err| {
            tracing::debug!("Multipart rejection: {err}");
            AppError::validation("Expected a multipart/form-data body")
        })?;

        let mut image: Option<(String, Option<String>, Bytes)> = None;
        let mut client_last_modified: Option<DateTime<Utc>> = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().map(ToString::to_string);
            match name.as_deref() {
                Some(IMAGE_FIELD) if image.is_none() => {
                    let Some(file_name) = field.file_name().map(ToString::to_string) else {
                        return Err(AppError::validation("Field `image` must be a file"));
                    };
                    // Unparsable MIME types are dropped so they never reach a response header
                    let content_type = field
                        .content_type()
                        .and_then(|value| value.parse::<mime::Mime>().ok())
                        .map(|mime| mime.to_string());
                    let bytes = field.bytes().await.map_err(multipart_error)?;

                    image = Some((file_name, content_type, bytes));
                }
                Some(LAST_MODIFIED_FIELD) => {
                    let text = field.text().await.map_err(multipart_error)?;
                    client_last_modified = text
                        .trim()
                        .parse::<i64>()
                        .ok()
                        .and_then(DateTime::from_timestamp_millis);
                }
                // Unknown and repeated fields are skipped
                _ => {}
            }
        }

        let Some((file_name, content_type, bytes)) = image else {
            return Err(AppError::validation("Missing file field `image`"));
        };

        Ok(Self {
            file_name,
            content_type,
            bytes,
            last_modified: client_last_modified.unwrap_or_else(Utc::now),
        })
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    tracing::debug!("Multipart error: {err}");
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::new(StatusCode::PAYLOAD_TOO_LARGE, "Upload exceeds maximum size")
    } else {
        AppError::validation("Invalid multipart body")
    }
}
