//! Order placement and lifecycle end to end.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use kabsh_api::store::OrderStore;
use kabsh_integration_tests::{TestApp, order_body};
use serde_json::json;

async fn place(app: &TestApp) -> i64 {
    let resp = app.post("/api/orders", &order_body(1)).await;
    assert_eq!(resp.status, StatusCode::CREATED);
    resp.json()["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_order_defaults_to_pending() {
    let app = TestApp::new();
    let id = place(&app).await;

    let order = app.get(&format!("/api/orders/{id}")).await.json();
    assert_eq!(order["status"], "pending");
    assert_eq!(order["totalAmount"], 76500.0);
    assert_eq!(order["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn test_empty_items_rejected_without_write() {
    let app = TestApp::new();
    let mut body = order_body(1);
    body["items"] = json!([]);

    let resp = app.post("/api/orders", &body).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), "يجب إضافة منتج واحد على الأقل");
    assert!(app.store().list_orders(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_zero_quantity_rejected() {
    let app = TestApp::new();
    let mut body = order_body(1);
    body["items"][0]["quantity"] = json!(0);

    let resp = app.post("/api/orders", &body).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), "الكمية يجب أن تكون 1 على الأقل");
    assert!(app.store().list_orders(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sheep_id_sent_as_string() {
    let app = TestApp::new();
    let mut body = order_body(1);
    body["items"][0]["sheepId"] = json!("7");
    let resp = app.post("/api/orders", &body).await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.json()["items"][0]["sheepId"], 7);

    body["items"][0]["sheepId"] = json!("sheep-7");
    let resp = app.post("/api/orders", &body).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), "معرف المنتج مطلوب");
}

#[tokio::test]
async fn test_unknown_wilaya_rejected() {
    let app = TestApp::new();
    let mut body = order_body(1);
    body["wilayaCode"] = json!("77");

    let resp = app.post("/api/orders", &body).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), "الولاية غير صالحة");
}

#[tokio::test]
async fn test_status_lifecycle() {
    let app = TestApp::new();
    let id = place(&app).await;
    let status_uri = format!("/api/orders/{id}/status");

    let resp = app.patch(&status_uri, &json!({"status": "completed"})).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.message(),
        "لا يمكن تغيير حالة الطلب من قيد الانتظار إلى مكتمل"
    );

    let resp = app.patch(&status_uri, &json!({"status": "processing"})).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["status"], "processing");

    // Same status again is a no-op
    let resp = app.patch(&status_uri, &json!({"status": "processing"})).await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = app.patch(&status_uri, &json!({"status": "completed"})).await;
    assert_eq!(resp.json()["status"], "completed");

    let resp = app.patch(&status_uri, &json!({"status": "cancelled"})).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app.patch(&status_uri, &json!({})).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), "حالة الطلب مطلوبة");
}

#[tokio::test]
async fn test_notes_set_and_cleared() {
    let app = TestApp::new();
    let id = place(&app).await;
    let uri = format!("/api/orders/{id}");

    let resp = app.patch(&uri, &json!({"notes": "الاتصال بعد العصر"})).await;
    assert_eq!(resp.json()["notes"], "الاتصال بعد العصر");
    assert_eq!(resp.json()["status"], "pending");

    let resp = app.patch(&uri, &json!({"notes": null})).await;
    assert!(resp.json().get("notes").is_none());
}

#[tokio::test]
async fn test_list_filters_by_status() {
    let app = TestApp::new();
    let first = place(&app).await;
    let second = place(&app).await;
    app.patch(
        &format!("/api/orders/{first}/status"),
        &json!({"status": "cancelled"}),
    )
    .await;

    let all = app.get("/api/orders").await.json();
    let ids: Vec<i64> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, [second, first]);

    let pending = app.get("/api/orders?status=pending").await.json();
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert_eq!(pending[0]["id"], second);
}

#[tokio::test]
async fn test_delete_order() {
    let app = TestApp::new();
    let id = place(&app).await;

    assert_eq!(
        app.delete(&format!("/api/orders/{id}")).await.status,
        StatusCode::NO_CONTENT
    );
    let resp = app.get(&format!("/api/orders/{id}")).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.message(), "الطلب غير موجود");
}
