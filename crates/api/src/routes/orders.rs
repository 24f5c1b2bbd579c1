//! Order routes.

use axum::{Json, extract::State, http::StatusCode};
use kabsh_core::models::Order;
use kabsh_core::validation::{OrderDraft, OrderPatch};
use kabsh_core::{OrderId, OrderStatus};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::or_not_found;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;
use crate::store::{RepositoryError, Store};

const NOT_FOUND: &str = "الطلب غير موجود";
const STALE_STATUS: &str = "تم تغيير حالة الطلب، يرجى إعادة المحاولة";

/// Listing filter.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
}

impl ListParams {
    fn status(&self) -> Result<Option<OrderStatus>> {
        match self.status.as_deref().map(str::trim) {
            None | Some("" | "all") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| AppError::BadRequest("حالة الطلب غير صالحة".to_owned())),
        }
    }
}

/// Body of the status-only endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusBody {
    pub status: Option<String>,
}

async fn find<S: Store>(state: &AppState<S>, id: OrderId) -> Result<Order> {
    state
        .store()
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_owned()))
}

async fn apply_patch<S: Store>(state: &AppState<S>, id: OrderId, patch: OrderPatch) -> Result<Order> {
    let order = find(state, id).await?;
    let from = order.status;
    let update = patch.validate(&order)?;
    if update.is_empty() {
        return Ok(order);
    }

    let order = state
        .store()
        .update_order(id, from, update)
        .await
        .map_err(|err| match err {
            RepositoryError::Conflict(detail) => {
                warn!(order_id = %id, %detail, "Order changed before update");
                AppError::Conflict(STALE_STATUS.to_owned())
            }
            other => or_not_found(NOT_FOUND)(other),
        })?;
    if order.status != from {
        info!(order_id = %id, from = %from, to = %order.status, "Order status changed");
    }
    Ok(order)
}

/// List orders, newest first.
///
/// GET /api/orders?status=
#[instrument(skip(state))]
pub async fn index<S: Store>(
    State(state): State<AppState<S>>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<Order>>> {
    let status = params.status()?;
    Ok(Json(state.store().list_orders(status).await?))
}

/// Get a single order.
///
/// GET /api/orders/{id}
#[instrument(skip(state))]
pub async fn show<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<Json<Order>> {
    Ok(Json(find(&state, id).await?))
}

/// Place an order.
///
/// POST /api/orders
#[instrument(skip(state, draft))]
pub async fn create<S: Store>(
    State(state): State<AppState<S>>,
    ApiJson(draft): ApiJson<OrderDraft>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = state.store().create_order(draft.validate()?).await?;

    info!(
        order_id = %order.id,
        wilaya = %order.wilaya_code,
        head_count = order.head_count(),
        total = %order.total_amount,
        "Order placed"
    );
    let order_id = order.id.to_string();
    add_breadcrumb("orders", "Order placed", Some(&[("order_id", order_id.as_str())]));
    Ok((StatusCode::CREATED, Json(order)))
}

/// Update status and/or notes.
///
/// PATCH /api/orders/{id}
#[instrument(skip(state, patch))]
pub async fn update<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<OrderId>,
    ApiJson(patch): ApiJson<OrderPatch>,
) -> Result<Json<Order>> {
    Ok(Json(apply_patch(&state, id, patch).await?))
}

/// Update the status only.
///
/// PATCH /api/orders/{id}/status
#[instrument(skip(state))]
pub async fn update_status<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<OrderId>,
    ApiJson(body): ApiJson<StatusBody>,
) -> Result<Json<Order>> {
    let status = body
        .status
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("حالة الطلب مطلوبة".to_owned()))?;
    let patch = OrderPatch {
        status: Some(status),
        notes: None,
    };
    Ok(Json(apply_patch(&state, id, patch).await?))
}

/// Delete an order.
///
/// DELETE /api/orders/{id}
#[instrument(skip(state))]
pub async fn destroy<S: Store>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<StatusCode> {
    state
        .store()
        .delete_order(id)
        .await
        .map_err(or_not_found(NOT_FOUND))?;
    info!(order_id = %id, "Order deleted");
    Ok(StatusCode::NO_CONTENT)
}
