//! Admin management end to end.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use kabsh_integration_tests::{PRIMARY_ADMIN, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_bootstrap_admin_recognized_with_empty_table() {
    let app = TestApp::with_primary_admin();

    let resp = app
        .get(&format!("/api/admins/check?email={PRIMARY_ADMIN}"))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    let check = resp.json();
    assert_eq!(check["isAdmin"], true);
    assert_eq!(check["role"], "primary");

    let list = app.get("/api/admins").await.json();
    assert_eq!(
        list,
        json!([{"id": null, "email": PRIMARY_ADMIN, "role": "primary", "addedAt": null}])
    );
}

#[tokio::test]
async fn test_check_is_case_insensitive() {
    let app = TestApp::with_primary_admin();
    let check = app
        .get("/api/admins/check?email=Owner@Kabsh.DZ")
        .await
        .json();
    assert_eq!(check["isAdmin"], true);
}

#[tokio::test]
async fn test_unknown_email_is_not_admin() {
    let app = TestApp::with_primary_admin();
    let check = app
        .get("/api/admins/check?email=someone@example.com")
        .await
        .json();
    assert_eq!(check["isAdmin"], false);
    assert_eq!(check["role"], json!(null));

    let resp = app.get("/api/admins/check?email=not-an-email").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_list_remove_secondary_admin() {
    let app = TestApp::with_primary_admin();

    let resp = app
        .post("/api/admins", &json!({"email": "helper@kabsh.dz"}))
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    let added = resp.json();
    assert_eq!(added["role"], "secondary");
    let id = added["id"].as_i64().unwrap();

    let list = app.get("/api/admins").await.json();
    let emails: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, [PRIMARY_ADMIN, "helper@kabsh.dz"]);

    let resp = app
        .post("/api/admins", &json!({"email": "helper@kabsh.dz"}))
        .await;
    assert_eq!(resp.status, StatusCode::CONFLICT);
    assert_eq!(resp.message(), "هذا المدير موجود بالفعل");

    let resp = app.delete(&format!("/api/admins/{id}")).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);

    let resp = app.delete(&format!("/api/admins/{id}")).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.message(), "المدير غير موجود");
}

#[tokio::test]
async fn test_bootstrap_email_reserved() {
    let app = TestApp::with_primary_admin();

    let resp = app
        .post("/api/admins", &json!({"email": PRIMARY_ADMIN}))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), "هذا البريد محجوز للمدير الرئيسي");

    let resp = app
        .post(
            "/api/admins",
            &json!({"email": "boss@kabsh.dz", "role": "primary"}),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), "لا يمكن إضافة مدير رئيسي");
}
