//! Kabsh Core - shared domain library.
//!
//! Types, validation rules and lookup tables used by the API server and the
//! command-line tools:
//! - `kabsh-api` - JSON HTTP API for the storefront and back-office
//! - `kabsh-cli` - migrations, admin management and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. The optional `postgres` feature adds
//! `sqlx` encode/decode impls for the newtypes and enums.
//!
//! # Modules
//!
//! - [`types`] - ids, email, status enums and image references
//! - [`models`] - stored entity shapes
//! - [`validation`] - input drafts and the rules that turn them into values
//! - [`locations`] - wilaya and commune tables
//! - [`catalog`] - discounted pricing, filtering and sorting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod locations;
pub mod models;
pub mod types;
pub mod validation;

pub use types::*;
