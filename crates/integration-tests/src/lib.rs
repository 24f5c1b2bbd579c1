//! Integration tests for Kabsh.
//!
//! The tests drive the full router (middleware included) in process against
//! the in-memory store, so no database or running server is needed.
//!
//! ```bash
//! cargo test -p kabsh-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - sheep listings and their pictures
//! - `orders` - order placement and lifecycle
//! - `admins` - bootstrap admin and admin management
//! - `users` - profiles and derived admin flags
//! - `images` - uploads and raw bytes

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use kabsh_api::config::ApiConfig;
use kabsh_api::store::MemoryStore;
use kabsh_api::{AppState, app};
use kabsh_core::Email;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Email configured as the bootstrap admin in [`TestApp::with_primary_admin`].
pub const PRIMARY_ADMIN: &str = "owner@kabsh.dz";

/// An application instance over a fresh in-memory store.
pub struct TestApp {
    router: Router,
    store: MemoryStore,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    /// Body parsed as JSON, `Value::Null` when empty.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn json(&self) -> Value {
        if self.bytes.is_empty() {
            return Value::Null;
        }
        serde_json::from_slice(&self.bytes).unwrap()
    }

    /// The `message` field of an error body.
    #[must_use]
    pub fn message(&self) -> String {
        self.json()["message"].as_str().unwrap_or_default().to_owned()
    }
}

impl TestApp {
    /// Application with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ApiConfig::default())
    }

    /// Application with [`PRIMARY_ADMIN`] as the bootstrap admin.
    ///
    /// # Panics
    ///
    /// Never; the constant is a valid email.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn with_primary_admin() -> Self {
        Self::with_config(ApiConfig {
            primary_admin_email: Some(Email::parse(PRIMARY_ADMIN).unwrap()),
            ..ApiConfig::default()
        })
    }

    /// Application with explicit configuration. Inline image storage is used
    /// regardless of `config.image_storage`.
    #[must_use]
    pub fn with_config(config: ApiConfig) -> Self {
        let store = MemoryStore::new();
        let state = AppState::with_storage(
            config,
            store.clone(),
            kabsh_api::services::ImageStorage::Inline,
        );
        Self {
            router: app(state),
            store,
        }
    }

    /// The backing store, for asserting on what was (not) written.
    #[must_use]
    pub const fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Send a request and buffer the response.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    #[allow(clippy::unwrap_used)]
    pub async fn request(&self, method: Method, uri: &str, body: Option<&Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            headers,
            bytes: bytes.to_vec(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: &Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// A complete, valid sheep body.
#[must_use]
pub fn sheep_body() -> Value {
    json!({
        "name": "خروف محلي ممتاز",
        "category": "محلي",
        "price": 85000,
        "discountPercentage": 10,
        "imageIds": ["https://images.unsplash.com/photo-1583337130417-3346a1be7dee"],
        "age": "سنتان",
        "weight": "85 كجم",
        "breed": "العواسي",
        "healthStatus": "ممتاز - تم الفحص البيطري",
        "description": "خروف عواسي محلي أصيل، صحة ممتازة، مناسب للأضحية.",
        "isFeatured": true
    })
}

/// A complete, valid order body for one sheep.
#[must_use]
pub fn order_body(sheep_id: i64) -> Value {
    json!({
        "userName": "محمد بن علي",
        "userPhone": "0555123456",
        "wilayaCode": "16",
        "wilayaName": "الجزائر",
        "communeId": 23,
        "communeName": "باب الوادي",
        "items": [{
            "sheepId": sheep_id,
            "sheepName": "خروف محلي ممتاز",
            "price": 76500,
            "quantity": 1
        }],
        "totalAmount": 76500
    })
}

/// One-pixel PNG, base64.
pub const PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";
