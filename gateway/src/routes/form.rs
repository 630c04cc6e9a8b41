use axum::{
    extract::{rejection::QueryRejection, Query},
    http::StatusCode,
    response::Html,
};
use serde::{Deserialize, Serialize};
use tinytemplate::TinyTemplate;
use tracing::instrument;

use crate::types::AppError;

/// Upload form with an optional preview of the last upload.
/// The preview is shown whenever `image` was given, even empty.
/// `{image}` is HTML-escaped by the default formatter.
const UPLOAD_FORM_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8" />
    <title>Image upload</title>
  </head>
  <body>
    <main>
      <form action="/image" method="POST" enctype="multipart/form-data">
        <input type="file" name="image" />
        <button type="submit">Upload</button>
      </form>
{{ if has_image }}
      <img style="max-width: calc(100vw - 80px); padding: 12px; margin-inline: 20px; box-shadow: 0 20px 25px -5px rgb(0 0 0 / 0.1), 0 8px 10px -6px rgb(0 0 0 / 0.1);" src="/image/{image}" alt="" />
{{ endif }}
    </main>
  </body>
</html>
"#;

#[derive(Debug, Default, Deserialize)]
pub struct RenderFormQuery {
    /// Identifier of an uploaded image to preview
    image: Option<String>,
}

#[derive(Serialize)]
struct FormContext<'a> {
    has_image: bool,
    image: &'a str,
}

/// Renders the upload form, previewing `image` when given
///
/// The identifier is not checked against storage; an unknown one renders a
/// broken image.
#[allow(clippy::unused_async)]
#[instrument(skip(query))]
pub async fn render_form(
    query: Result<Query<RenderFormQuery>, QueryRejection>,
) -> Result<Html<String>, AppError> {
    // A malformed query string just drops the preview
    let query = query.map(|Query(query)| query).unwrap_or_default();

    render_upload_form(query.image.as_deref()).map(Html)
}

fn render_upload_form(image: Option<&str>) -> Result<String, AppError> {
    let mut tt = TinyTemplate::new();
    tt.add_template("upload_form", UPLOAD_FORM_TEMPLATE)
        .and_then(|()| {
            let context = FormContext {
                has_image: image.is_some(),
                image: image.unwrap_or_default(),
            };
            tt.render("upload_form", &context)
        })
        .map_err(|e| {
            tracing::error!("Failed to render upload form: {e}");
            AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page")
        })
}
