//! HTTP middleware stack for the API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS (any origin, the storefront and back office are separate hosts)

pub mod cors;
pub mod request_id;

pub use cors::cors_layer;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
