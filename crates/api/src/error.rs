//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`
//! and every error body is `{"message": "..."}`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kabsh_core::validation::ValidationError;
use serde::Serialize;
use thiserror::Error;

use crate::services::{AdminError, ImageHostError};
use crate::store::RepositoryError;

/// Message shown for any server-side failure whose details stay in the logs.
pub const INTERNAL_MESSAGE: &str = "حدث خطأ في الخادم";

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed a validation rule.
    #[error("Validation error on {}: {}", .0.field, .0.message)]
    Validation(#[from] ValidationError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Image host rejected or failed an upload.
    #[error("Image host error: {0}")]
    ImageHost(#[from] ImageHostError),

    /// Admin management rule violated.
    #[error("Admin error: {0}")]
    Admin(#[from] AdminError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The resource changed since it was read.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(err) | Self::Admin(AdminError::Repository(err)) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Admin(err) => match err {
                AdminError::ReservedEmail | AdminError::PrimaryUndeletable => {
                    StatusCode::BAD_REQUEST
                }
                AdminError::AlreadyExists => StatusCode::CONFLICT,
                AdminError::NotFound => StatusCode::NOT_FOUND,
                AdminError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ImageHost(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the client. Internal details are never exposed.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Validation(err) => err.message.clone(),
            Self::Database(err) | Self::Admin(AdminError::Repository(err)) => match err {
                RepositoryError::NotFound => "العنصر غير موجود".to_owned(),
                RepositoryError::Conflict(_) => "العنصر موجود بالفعل".to_owned(),
                _ => INTERNAL_MESSAGE.to_owned(),
            },
            Self::Admin(err) => err.to_string(),
            Self::ImageHost(err) => err.client_message(),
            Self::NotFound(msg) | Self::BadRequest(msg) | Self::Conflict(msg) => msg.clone(),
            Self::Internal(_) => INTERNAL_MESSAGE.to_owned(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorBody {
            message: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("بيانات الطلب غير صالحة: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(format!("المعرف غير صالح: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(format!("معاملات البحث غير صالحة: {}", rejection.body_text()))
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for business events.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("orders", "Order placed", Some(&[("order_id", "12")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
