use axum::response::Response;
use http_body_util::BodyExt;

pub const BOUNDARY: &str = "X-IMAGE-GATEWAY-BOUNDARY";

/// A single part of a `multipart/form-data` body
pub enum Part<'a> {
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: Option<&'a str>,
        data: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

/// Encode parts as a `multipart/form-data` body delimited by `BOUNDARY`
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n"
                    )
                    .as_bytes(),
                );
                if let Some(content_type) = content_type {
                    body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
                }
                body.extend_from_slice(b"\r\n");
                body.extend_from_slice(data);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Collect a response body into bytes
pub async fn response_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response_bytes(response).await;
    serde_json::from_slice(&body).unwrap()
}

/// Extract the `image` query parameter from a `/?image=<id>` redirect
pub fn image_id_from_location(response: &Response) -> String {
    let location = response
        .headers()
        .get(http::header::LOCATION)
        .expect("redirect should carry a Location header")
        .to_str()
        .unwrap();

    let url = url::Url::parse("http://localhost")
        .unwrap()
        .join(location)
        .unwrap();
    assert_eq!(url.path(), "/");

    url.query_pairs()
        .find(|(key, _)| key == "image")
        .map(|(_, value)| value.into_owned())
        .expect("redirect should carry an image query parameter")
}
