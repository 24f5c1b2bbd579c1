//! Algerian administrative divisions, served from the built-in table.

use axum::Json;
use kabsh_core::locations::{
    Commune, Wilaya, get_commune_by_id, get_communes_by_wilaya, get_wilaya_by_code,
    get_wilayas,
};

use crate::error::{AppError, Result};
use crate::extract::ApiPath;

const WILAYA_NOT_FOUND: &str = "الولاية غير موجودة";
const COMMUNE_NOT_FOUND: &str = "البلدية غير موجودة";

/// GET /api/locations/wilayas
pub async fn wilayas() -> Json<Vec<Wilaya>> {
    Json(get_wilayas())
}

/// GET /api/locations/wilayas/{code}
pub async fn wilaya(ApiPath(code): ApiPath<String>) -> Result<Json<Wilaya>> {
    get_wilaya_by_code(&code)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(WILAYA_NOT_FOUND.to_owned()))
}

/// GET /api/locations/wilayas/{code}/communes
pub async fn communes(ApiPath(code): ApiPath<String>) -> Result<Json<Vec<Commune>>> {
    if get_wilaya_by_code(&code).is_none() {
        return Err(AppError::NotFound(WILAYA_NOT_FOUND.to_owned()));
    }
    Ok(Json(get_communes_by_wilaya(&code)))
}

/// GET /api/locations/communes/{id}
pub async fn commune(ApiPath(id): ApiPath<i32>) -> Result<Json<Commune>> {
    get_commune_by_id(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(COMMUNE_NOT_FOUND.to_owned()))
}
