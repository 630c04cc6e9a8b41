mod common;

use common::*;

use http::{header, StatusCode};

#[tokio::test]
async fn test_form_without_image_has_no_preview() {
    let setup = TestSetup::new();

    let response = setup
        .send_get_request("/")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = String::from_utf8(response_bytes(response).await).unwrap();
    assert!(html.contains(r#"<form action="/image" method="POST" enctype="multipart/form-data">"#));
    assert!(!html.contains("<img"));
}

#[tokio::test]
async fn test_form_with_image_renders_preview_without_lookup() {
    let setup = TestSetup::new();

    let response = setup
        .send_get_request("/?image=does-not-exist")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(response_bytes(response).await).unwrap();
    assert!(html.contains(r#"src="/image/does-not-exist""#));

    // The preview is rendered without consulting storage
    assert_eq!(setup.image_storage.get_count(), 0);
}

#[tokio::test]
async fn test_form_with_empty_image_renders_preview() {
    let setup = TestSetup::new();

    let response = setup
        .send_get_request("/?image=")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(response_bytes(response).await).unwrap();
    assert!(html.contains(r#"src="/image/""#));
}

#[tokio::test]
async fn test_form_after_upload_previews_uploaded_image() {
    let setup = TestSetup::new();

    let response = setup
        .upload("hello.png", "image/png", b"hello.png\n")
        .await
        .expect("Failed to send request");
    let location = response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string();
    let image_id = image_id_from_location(&response);

    let response = setup
        .send_get_request(&location)
        .await
        .expect("Failed to send request");

    let html = String::from_utf8(response_bytes(response).await).unwrap();
    assert!(html.contains(&format!(r#"src="/image/{image_id}""#)));
}

#[tokio::test]
async fn test_health() {
    let setup = TestSetup::new();

    let response = setup
        .send_get_request("/health")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["semver"], env!("CARGO_PKG_VERSION"));
}
