//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                - Liveness
//! GET    /health/ready                          - Readiness (store ping)
//!
//! # Images
//! POST   /api/images                            - Upload
//! GET    /api/images/{id}                       - Metadata
//! GET    /api/images/{id}/raw                   - Bytes, or redirect to the host
//!
//! # Sheep
//! GET    /api/sheep?category=&featured=&sort=   - Listing
//! GET    /api/sheep/{id}                        - Detail
//! POST   /api/sheep                             - Create (optionally with uploads)
//! PATCH  /api/sheep/{id}                        - Partial update
//! DELETE /api/sheep/{id}                        - Delete
//!
//! # Orders
//! GET    /api/orders?status=                    - Newest first
//! GET    /api/orders/{id}                       - Detail
//! POST   /api/orders                            - Place order
//! PATCH  /api/orders/{id}                       - Status and notes
//! PATCH  /api/orders/{id}/status                - Status only
//! DELETE /api/orders/{id}                       - Delete
//!
//! # Admins
//! GET    /api/admins                            - Bootstrap admin, then stored
//! POST   /api/admins                            - Add
//! DELETE /api/admins/{id}                       - Remove
//! GET    /api/admins/check?email=               - Is this email an admin?
//!
//! # Users
//! GET    /api/users/{uid}                       - Profile with admin flags
//! POST   /api/users/{uid}                       - Create or replace
//! PATCH  /api/users/{uid}                       - Partial update
//!
//! # Locations
//! GET    /api/locations/wilayas                 - All wilayas
//! GET    /api/locations/wilayas/{code}          - One wilaya
//! GET    /api/locations/wilayas/{code}/communes - Communes of a wilaya
//! GET    /api/locations/communes/{id}           - One commune
//! ```

pub mod admins;
pub mod images;
pub mod locations;
pub mod orders;
pub mod sheep;
pub mod users;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware::from_fn,
    routing::{delete, get, patch, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::{cors_layer, request_id_middleware};
use crate::state::AppState;
use crate::store::{RepositoryError, Store};

/// Largest accepted request body. Fits a 10 MB image once base64 encoded and
/// wrapped in JSON.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Create the image routes router.
pub fn image_routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/", post(images::upload::<S>))
        .route("/{id}", get(images::show::<S>))
        .route("/{id}/raw", get(images::raw::<S>))
}

/// Create the sheep routes router.
pub fn sheep_routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(sheep::index::<S>).post(sheep::create::<S>))
        .route(
            "/{id}",
            get(sheep::show::<S>)
                .patch(sheep::update::<S>)
                .delete(sheep::destroy::<S>),
        )
}

/// Create the order routes router.
pub fn order_routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(orders::index::<S>).post(orders::create::<S>))
        .route(
            "/{id}",
            get(orders::show::<S>)
                .patch(orders::update::<S>)
                .delete(orders::destroy::<S>),
        )
        .route("/{id}/status", patch(orders::update_status::<S>))
}

/// Create the admin routes router.
pub fn admin_routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(admins::index::<S>).post(admins::create::<S>))
        .route("/check", get(admins::check::<S>))
        .route("/{id}", delete(admins::destroy::<S>))
}

/// Create the user profile routes router.
pub fn user_routes<S: Store>() -> Router<AppState<S>> {
    Router::new().route(
        "/{uid}",
        get(users::show::<S>)
            .post(users::upsert::<S>)
            .patch(users::update::<S>),
    )
}

/// Create the location routes router.
pub fn location_routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/wilayas", get(locations::wilayas))
        .route("/wilayas/{code}", get(locations::wilaya))
        .route("/wilayas/{code}/communes", get(locations::communes))
        .route("/communes/{id}", get(locations::commune))
}

/// Create all `/api` routes.
pub fn routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .nest("/api/images", image_routes())
        .nest("/api/sheep", sheep_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/admins", admin_routes())
        .nest("/api/users", user_routes())
        .nest("/api/locations", location_routes())
}

/// Build the application router with health checks, tracing, request ids and
/// CORS. Sentry layers are added by the binary.
pub fn app<S: Store>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness::<S>))
        .merge(routes())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(cors_layer())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness<S: Store>(State(state): State<AppState<S>>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Map a missing row to a 404 with `message`; everything else stays a store
/// error.
fn or_not_found(message: &'static str) -> impl FnOnce(RepositoryError) -> AppError {
    move |err| match err {
        RepositoryError::NotFound => AppError::NotFound(message.to_owned()),
        other => AppError::Database(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, Response};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::ApiConfig;
    use crate::middleware::REQUEST_ID_HEADER;
    use crate::store::MemoryStore;

    fn router() -> Router {
        app(AppState::new(ApiConfig::default(), MemoryStore::new()).unwrap())
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn send_json(method: Method, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let response = router().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router().oneshot(get("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_id_generated_and_echoed() {
        let response = router().oneshot(get("/health")).await.unwrap();
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let request = Request::builder()
            .uri("/health")
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc-123");
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/sheep")
            .header("origin", "https://shop.example")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_unknown_sheep_is_json_404() {
        let response = router().oneshot(get("/api/sheep/999")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["message"], "الخروف غير موجود");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_json_400() {
        let response = router().oneshot(get("/api/orders/abc")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["message"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_json_is_json_400() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/orders")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["message"].is_string());
    }

    #[tokio::test]
    async fn test_invalid_list_filters_rejected() {
        let response = router()
            .oneshot(get("/api/orders?status=shipped"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "حالة الطلب غير صالحة");

        let response = router()
            .oneshot(get("/api/sheep?sort=cheapest"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_locations() {
        let response = router()
            .oneshot(get("/api/locations/wilayas"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 58);

        let response = router()
            .oneshot(get("/api/locations/wilayas/9"))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["code"], "09");

        let response = router()
            .oneshot(get("/api/locations/wilayas/99/communes"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = router()
            .oneshot(get("/api/locations/communes/999999"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sheep_listing_filters_and_effective_price() {
        let app = router();
        for (name, category, price, discount, featured) in [
            ("خروف محلي", "محلي", 60000, None, true),
            ("خروف روماني", "روماني", 90000, Some(10), false),
            ("خروف إسباني", "إسباني", 80000, None, false),
        ] {
            let body = json!({
                "name": name,
                "category": category,
                "price": price,
                "discountPercentage": discount,
                "imageIds": ["https://img.example/1.jpg"],
                "age": "سنة",
                "weight": "45 كغ",
                "breed": "أولاد جلال",
                "healthStatus": "ممتاز",
                "description": "خروف سليم ومعتنى به جيداً",
                "isFeatured": featured,
            });
            let response = app
                .clone()
                .oneshot(send_json(Method::POST, "/api/sheep", &body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .clone()
            .oneshot(get("/api/sheep?category=%D8%A3%D8%AC%D9%86%D8%A8%D9%8A&sort=price-asc"))
            .await
            .unwrap();
        let listing = json_body(response).await;
        let names: Vec<&str> = listing
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["خروف إسباني", "خروف روماني"]);
        assert_eq!(listing[1]["effectivePrice"], 81000.0);

        let response = app
            .oneshot(get("/api/sheep?featured=true"))
            .await
            .unwrap();
        let listing = json_body(response).await;
        assert_eq!(listing.as_array().unwrap().len(), 1);
        assert_eq!(listing[0]["images"][0], "https://img.example/1.jpg");
    }
}
