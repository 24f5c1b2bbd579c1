//! Core types for Kabsh.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod image_ref;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use image_ref::{ImageRef, InvalidImageRef};
pub use status::*;
