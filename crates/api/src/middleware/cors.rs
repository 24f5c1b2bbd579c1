//! CORS policy.

use tower_http::cors::{Any, CorsLayer};

/// Permissive CORS: any origin, method and header.
///
/// No credentials are exchanged through cookies, so wildcard origins are
/// acceptable.
#[must_use]
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([axum::http::HeaderName::from_static(
            super::REQUEST_ID_HEADER,
        )])
}
