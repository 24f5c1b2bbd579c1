//! User profile routes.
//!
//! Admin status is never stored on the profile; it is derived from the admin
//! directory on every read.

use axum::{Json, extract::State};
use kabsh_core::AdminRole;
use kabsh_core::models::UserProfile;
use kabsh_core::validation::UserProfileDraft;
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;
use crate::store::Store;

const NOT_FOUND: &str = "المستخدم غير موجود";

/// A profile with the derived admin flags.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub is_admin: bool,
    pub admin_role: Option<AdminRole>,
}

async fn render<S: Store>(state: &AppState<S>, profile: UserProfile) -> Result<UserView> {
    let admin_role = match &profile.email {
        Some(email) => state.admins().role_of(state.store(), email).await?,
        None => None,
    };
    Ok(UserView {
        profile,
        is_admin: admin_role.is_some(),
        admin_role,
    })
}

/// Get a profile.
///
/// GET /api/users/{uid}
#[instrument(skip(state))]
pub async fn show<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(uid): ApiPath<String>,
) -> Result<Json<UserView>> {
    let profile = state
        .store()
        .get_user(&uid)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_owned()))?;
    Ok(Json(render(&state, profile).await?))
}

/// Create or replace a profile.
///
/// POST /api/users/{uid}
#[instrument(skip(state, draft))]
pub async fn upsert<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(uid): ApiPath<String>,
    ApiJson(draft): ApiJson<UserProfileDraft>,
) -> Result<Json<UserView>> {
    let profile = state.store().upsert_user(draft.validate(&uid)?).await?;
    info!(uid = %profile.uid, user_type = %profile.user_type, "User profile saved");
    Ok(Json(render(&state, profile).await?))
}

/// Apply a partial update to an existing profile.
///
/// PATCH /api/users/{uid}
#[instrument(skip(state, patch))]
pub async fn update<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(uid): ApiPath<String>,
    ApiJson(patch): ApiJson<UserProfileDraft>,
) -> Result<Json<UserView>> {
    let existing = state
        .store()
        .get_user(&uid)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_owned()))?;

    let merged = UserProfileDraft::from(&existing).merge(patch).validate(&uid)?;
    let profile = state.store().upsert_user(merged).await?;
    Ok(Json(render(&state, profile).await?))
}
