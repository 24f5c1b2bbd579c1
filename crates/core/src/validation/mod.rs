//! Input validation.
//!
//! Request bodies are deserialized into permissive "draft" structs where every
//! field is optional, then checked here field by field. The first failing
//! field wins and its Arabic message is what the client sees. Nothing in this
//! module touches storage.

mod admin;
mod image;
mod order;
mod sheep;
mod user;

use serde::{Deserialize, Deserializer};

pub use admin::{AdminDraft, NewAdmin};
pub use image::{ImageUpload, ImageUploadDraft, MAX_IMAGE_BYTES, SUPPORTED_IMAGE_TYPES};
pub use order::{NewOrder, OrderDraft, OrderItemDraft, OrderPatch, OrderUpdate};
pub use sheep::{NewSheep, SheepDraft};
pub use user::{NewUserProfile, UserProfileDraft};

/// A rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Wire name of the offending field, e.g. `items[0].quantity`.
    pub field: String,
    /// Arabic message shown to the user.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Shorthand result for validators.
pub type Validated<T> = Result<T, ValidationError>;

/// Distinguish "field absent" (`None`) from "field set to null" (`Some(None)`)
/// in partial updates.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trimmed, non-empty text or the given error.
pub(crate) fn required_text(
    value: Option<String>,
    field: &str,
    message: &str,
) -> Validated<String> {
    match value.map(|v| v.trim().to_owned()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::new(field, message)),
    }
}

/// Trimmed text with blank values folded to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
