//! Sheep listing routes.
//!
//! Responses carry both the stored references (`imageIds`) and the resolved,
//! displayable URLs (`images`).

use axum::{Json, extract::State, http::StatusCode};
use kabsh_core::SheepId;
use kabsh_core::catalog::{CategoryFilter, SheepQuery, SortOrder};
use kabsh_core::models::Sheep;
use kabsh_core::validation::{ImageUploadDraft, SheepDraft, ValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::or_not_found;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;
use crate::store::Store;

const NOT_FOUND: &str = "الخروف غير موجود";

/// A listing as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheepView {
    #[serde(flatten)]
    pub sheep: Sheep,
    /// Resolved picture URLs, unresolvable references skipped.
    pub images: Vec<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub effective_price: Decimal,
}

async fn render<S: Store>(state: &AppState<S>, sheep: Sheep) -> SheepView {
    let images = state.images().resolve(&sheep.image_ids).await;
    SheepView {
        effective_price: sheep.effective_price(),
        sheep,
        images,
    }
}

/// Listing filters.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub featured: Option<String>,
    pub sort: Option<String>,
}

impl ListParams {
    fn into_query(self) -> Result<SheepQuery> {
        let category = match self.category.as_deref() {
            None => None,
            Some(raw) => CategoryFilter::parse(raw)
                .map_err(|_| AppError::BadRequest("الفئة غير صالحة".to_owned()))?,
        };
        let featured = match self.featured.as_deref().map(str::trim) {
            None | Some("") => None,
            Some("true" | "1") => Some(true),
            Some("false" | "0") => Some(false),
            Some(_) => return Err(AppError::BadRequest("قيمة featured غير صالحة".to_owned())),
        };
        let sort = match self.sort.as_deref() {
            None => SortOrder::default(),
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::BadRequest("ترتيب غير صالح".to_owned()))?,
        };
        Ok(SheepQuery {
            category,
            featured,
            sort,
        })
    }
}

/// Creation body: the listing plus pictures to upload with it.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateSheepRequest {
    #[serde(flatten)]
    pub sheep: SheepDraft,
    pub uploads: Vec<ImageUploadDraft>,
}

/// List sheep.
///
/// GET /api/sheep?category=&featured=&sort=
#[instrument(skip(state))]
pub async fn index<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<SheepView>>> {
    let query = params.into_query()?;
    let listing = query.apply(state.store().list_sheep().await?);

    let mut views = Vec::with_capacity(listing.len());
    for sheep in listing {
        views.push(render(&state, sheep).await);
    }
    Ok(Json(views))
}

/// Get a single listing.
///
/// GET /api/sheep/{id}
#[instrument(skip(state))]
pub async fn show<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<SheepId>,
) -> Result<Json<SheepView>> {
    let sheep = state
        .store()
        .get_sheep(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_owned()))?;
    Ok(Json(render(&state, sheep).await))
}

/// Create a listing, uploading any inline pictures in the same unit of work.
///
/// POST /api/sheep
#[instrument(skip(state, body), fields(uploads = body.uploads.len()))]
pub async fn create<S: Store>(
    State(state): State<AppState<S>>,
    ApiJson(body): ApiJson<CreateSheepRequest>,
) -> Result<(StatusCode, Json<SheepView>)> {
    let sheep = body.sheep.validate_with_uploads(body.uploads.len())?;

    let mut uploads = Vec::with_capacity(body.uploads.len());
    for (i, draft) in body.uploads.into_iter().enumerate() {
        let upload = draft.validate().map_err(|e| {
            ValidationError::new(format!("uploads[{i}].{}", e.field), e.message)
        })?;
        uploads.push(upload);
    }

    let mut images = Vec::with_capacity(uploads.len());
    for upload in uploads {
        images.push(state.storage().prepare(upload).await?);
    }

    let sheep = if images.is_empty() {
        state.store().create_sheep(sheep).await?
    } else {
        state.store().create_sheep_with_images(sheep, images).await?.0
    };

    info!(sheep_id = %sheep.id, category = %sheep.category, "Sheep created");
    let sheep_id = sheep.id.to_string();
    add_breadcrumb("catalog", "Sheep created", Some(&[("sheep_id", sheep_id.as_str())]));
    Ok((StatusCode::CREATED, Json(render(&state, sheep).await)))
}

/// Apply a partial update, re-validating the merged listing.
///
/// PATCH /api/sheep/{id}
#[instrument(skip(state, patch))]
pub async fn update<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<SheepId>,
    ApiJson(patch): ApiJson<SheepDraft>,
) -> Result<Json<SheepView>> {
    let existing = state
        .store()
        .get_sheep(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_owned()))?;

    let merged = SheepDraft::from(&existing).merge(patch).validate()?;
    let sheep = state
        .store()
        .update_sheep(id, merged)
        .await
        .map_err(or_not_found(NOT_FOUND))?;

    info!(sheep_id = %id, "Sheep updated");
    Ok(Json(render(&state, sheep).await))
}

/// Delete a listing.
///
/// DELETE /api/sheep/{id}
#[instrument(skip(state))]
pub async fn destroy<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<SheepId>,
) -> Result<StatusCode> {
    state
        .store()
        .delete_sheep(id)
        .await
        .map_err(or_not_found(NOT_FOUND))?;
    info!(sheep_id = %id, "Sheep deleted");
    Ok(StatusCode::NO_CONTENT)
}
