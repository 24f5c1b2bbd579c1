//! Admin management routes.

use axum::{Json, extract::State, http::StatusCode};
use kabsh_core::validation::{AdminDraft, ValidationError};
use kabsh_core::{AdminId, Email};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::services::{AdminCheck, AdminEntry};
use crate::state::AppState;
use crate::store::Store;

/// Query of the admin check endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct CheckParams {
    pub email: Option<String>,
}

/// List admins, bootstrap admin first.
///
/// GET /api/admins
#[instrument(skip(state))]
pub async fn index<S: Store>(State(state): State<AppState<S>>) -> Result<Json<Vec<AdminEntry>>> {
    Ok(Json(state.admins().list(state.store()).await?))
}

/// Add a secondary admin.
///
/// POST /api/admins
#[instrument(skip(state, draft))]
pub async fn create<S: Store>(
    State(state): State<AppState<S>>,
    ApiJson(draft): ApiJson<AdminDraft>,
) -> Result<(StatusCode, Json<AdminEntry>)> {
    let admin = state.admins().add(state.store(), draft.validate()?).await?;
    Ok((StatusCode::CREATED, Json(AdminEntry::from(admin))))
}

/// Remove a stored admin.
///
/// DELETE /api/admins/{id}
#[instrument(skip(state))]
pub async fn destroy<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<AdminId>,
) -> Result<StatusCode> {
    state.admins().remove(state.store(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Whether an email belongs to an admin.
///
/// GET /api/admins/check?email=
#[instrument(skip(state))]
pub async fn check<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(params): ApiQuery<CheckParams>,
) -> Result<Json<AdminCheck>> {
    let email = params
        .email
        .as_deref()
        .and_then(|raw| Email::parse(raw).ok())
        .ok_or_else(|| ValidationError::new("email", "البريد الإلكتروني غير صالح"))?;
    Ok(Json(state.admins().check(state.store(), email).await?))
}
