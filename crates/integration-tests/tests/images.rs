//! Image uploads end to end.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header};
use kabsh_integration_tests::{PIXEL_PNG, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_upload_then_fetch_metadata_and_bytes() {
    let app = TestApp::new();
    let resp = app
        .post(
            "/api/images",
            &json!({
                "imageData": format!("data:image/png;base64,{PIXEL_PNG}"),
                "mimeType": "image/png",
                "originalFileName": "pixel.png"
            }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    let image = resp.json();
    let id = image["id"].as_i64().unwrap();
    assert_eq!(image["imageUrl"], format!("data:image/png;base64,{PIXEL_PNG}"));
    assert_eq!(image["thumbnailUrl"], image["imageUrl"]);
    assert_eq!(image["fileSize"], 70);

    let meta = app.get(&format!("/api/images/{id}")).await.json();
    assert_eq!(meta["originalFileName"], "pixel.png");
    assert_eq!(meta["mimeType"], "image/png");

    let raw = app.get(&format!("/api/images/{id}/raw")).await;
    assert_eq!(raw.status, StatusCode::OK);
    assert_eq!(raw.headers[header::CONTENT_TYPE], "image/png");
    assert_eq!(&raw.bytes[1..4], b"PNG");
}

#[tokio::test]
async fn test_upload_rejections() {
    let app = TestApp::new();

    let resp = app.post("/api/images", &json!({"mimeType": "image/png"})).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), "بيانات الصورة مطلوبة");

    let resp = app
        .post(
            "/api/images",
            &json!({"imageData": PIXEL_PNG, "mimeType": "application/pdf"}),
        )
        .await;
    assert_eq!(resp.message(), "نوع الصورة غير مدعوم");

    let resp = app
        .post(
            "/api/images",
            &json!({"imageData": "%%% not base64 %%%", "mimeType": "image/png"}),
        )
        .await;
    assert_eq!(resp.message(), "بيانات الصورة غير صالحة");
}

#[tokio::test]
async fn test_missing_image() {
    let app = TestApp::new();
    let resp = app.get("/api/images/42/raw").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.message(), "الصورة غير موجودة");
}

/// Base64 of `len` zero bytes, `len` a multiple of 3.
fn zeroed_base64(len: usize) -> String {
    "AAAA".repeat(len / 3)
}

#[tokio::test]
async fn test_upload_of_several_megabytes_is_accepted() {
    let app = TestApp::new();
    let resp = app
        .post(
            "/api/images",
            &json!({
                "imageData": zeroed_base64(3 * 1024 * 1024),
                "mimeType": "image/jpeg"
            }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.json()["fileSize"], 3 * 1024 * 1024);
}

#[tokio::test]
async fn test_upload_over_ten_megabytes_gets_size_message() {
    let app = TestApp::new();
    let resp = app
        .post(
            "/api/images",
            &json!({
                "imageData": zeroed_base64(11 * 1024 * 1024 + 2),
                "mimeType": "image/jpeg"
            }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), "حجم الصورة يتجاوز 10 ميغابايت");
}
