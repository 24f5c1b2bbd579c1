//! Kabsh API library.
//!
//! JSON HTTP API for the sheep storefront and its back office. Exposed as a
//! library so the router can be driven in tests and the persistence layer
//! reused by the command-line tools.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use routes::app;
pub use state::AppState;
