//! Image routes.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use kabsh_core::ImageId;
use kabsh_core::models::{Image, ImageSource};
use kabsh_core::validation::ImageUploadDraft;
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;
use crate::store::Store;

const NOT_FOUND: &str = "الصورة غير موجودة";

/// Image metadata as returned to clients. Inline payloads are exposed as a
/// `data:` URL in `imageUrl`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    pub id: ImageId,
    pub mime_type: String,
    pub original_file_name: Option<String>,
    pub file_size: Option<i64>,
    pub image_url: String,
    pub thumbnail_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<Image> for ImageView {
    fn from(image: Image) -> Self {
        let image_url = image.display_url();
        let thumbnail_url = image
            .thumbnail_url()
            .map_or_else(|| image_url.clone(), str::to_owned);
        Self {
            id: image.id,
            mime_type: image.mime_type,
            original_file_name: image.original_file_name,
            file_size: image.file_size,
            image_url,
            thumbnail_url,
            created_at: image.created_at,
        }
    }
}

async fn find<S: Store>(state: &AppState<S>, id: ImageId) -> Result<Image> {
    state
        .store()
        .get_image(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_owned()))
}

/// Upload a picture.
///
/// POST /api/images
#[instrument(skip(state, draft))]
pub async fn upload<S: Store>(
    State(state): State<AppState<S>>,
    ApiJson(draft): ApiJson<ImageUploadDraft>,
) -> Result<(StatusCode, Json<ImageView>)> {
    let upload = draft.validate()?;
    let new = state.storage().prepare(upload).await?;
    let image = state.store().create_image(new).await?;

    info!(
        image_id = %image.id,
        mime_type = %image.mime_type,
        inline = image.is_inline(),
        "Image stored"
    );
    Ok((StatusCode::CREATED, Json(ImageView::from(image))))
}

/// Image metadata.
///
/// GET /api/images/{id}
#[instrument(skip(state))]
pub async fn show<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<ImageId>,
) -> Result<Json<ImageView>> {
    Ok(Json(ImageView::from(find(&state, id).await?)))
}

/// Picture bytes with the stored content type, or a redirect to the host.
///
/// GET /api/images/{id}/raw
#[instrument(skip(state))]
pub async fn raw<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<ImageId>,
) -> Result<Response> {
    let image = find(&state, id).await?;
    match image.source {
        ImageSource::Hosted { image_url, .. } => {
            Ok(Redirect::temporary(&image_url).into_response())
        }
        ImageSource::Inline { data } => {
            let bytes = STANDARD.decode(data.as_bytes()).map_err(|e| {
                AppError::Internal(format!("stored image {id} is not valid base64: {e}"))
            })?;
            Ok((
                [
                    (header::CONTENT_TYPE, image.mime_type),
                    (
                        header::CACHE_CONTROL,
                        "public, max-age=31536000, immutable".to_owned(),
                    ),
                ],
                bytes,
            )
                .into_response())
        }
    }
}
