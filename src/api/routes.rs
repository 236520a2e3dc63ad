//! Axum router and the `/orders` handlers.
//!
//! `build_router` is the single entry point. Middleware (tracing, CORS) is attached in
//! `main.rs` so tests can drive the bare router.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::{debug, info};

use crate::api::api_types::{ListParams, PatchStatusBody};
use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::model::OrderId;
use crate::order_actor::OrderActionResult;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/:id", get(get_order).patch(patch_order))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /orders
// ---------------------------------------------------------------------------

pub(crate) async fn list_orders(
    State(st): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let query = params.into_query()?;
    let list = st.orders.list_orders(query).await?;
    debug!(total = list.total, returned = list.items.len(), "Listed orders");
    Ok((StatusCode::OK, Json(list)))
}

// ---------------------------------------------------------------------------
// GET /orders/:id
// ---------------------------------------------------------------------------

pub(crate) async fn get_order(
    State(st): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let order = st.orders.get_order(OrderId::coerce(&raw_id)).await?;
    Ok((StatusCode::OK, Json(order)))
}

// ---------------------------------------------------------------------------
// PATCH /orders/:id
// ---------------------------------------------------------------------------

/// Status change. Checks run in a fixed order: unknown id (404), missing status (400),
/// unparseable status (400), then the store's transition, which answers a same-status
/// request with the unchanged order and a disallowed pair with 422.
///
/// The body is read leniently: anything that is not a JSON object counts as a missing
/// status, while a `status` of the wrong type is an invalid one.
pub(crate) async fn patch_order(
    State(st): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let id = OrderId::coerce(&raw_id);
    let current = st.orders.get_order(id.clone()).await?;

    let to = PatchStatusBody::from_bytes(&body).status()?;

    let result = st.orders.transition(id, to).await.map_err(|e| match ApiError::from(e) {
        ApiError::InvalidTransition { from, to, .. } => ApiError::InvalidTransition {
            from,
            to,
            allowed: st.policy.allowed_next(from).to_vec(),
        },
        other => other,
    })?;

    let order = match result {
        OrderActionResult::Transitioned(order) => {
            info!(id = %order.id, from = %current.status, to = %order.status, "Status changed");
            order
        }
        OrderActionResult::Unchanged(order) => order,
    };
    Ok((StatusCode::OK, Json(order)))
}
