//! Order endpoints
//!
//! Customers place and list their orders; sellers work through their pending
//! queue by 1-based position. `GET /ordersOwner` returns a `snapshot` id that
//! the resolve endpoints accept as `?snapshot=` to pin the queue they saw.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{CreateOrderRequest, Order, OrderOutcome};

use super::ApiResult;
use crate::auth::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .route("/ordersOwner", get(list_pending))
        .route("/ordersOwner/{position}/accept", patch(accept_order))
        .route("/ordersOwner/{position}/cancel", patch(cancel_order))
}

#[derive(Debug, Default, Deserialize)]
pub struct ResolveQuery {
    pub snapshot: Option<String>,
}

/// Pending queue body: the orders plus the snapshot id they were listed under
#[derive(Debug, Serialize)]
pub struct PendingOrdersResponse {
    pub code: u16,
    pub message: String,
    pub data: Vec<Order>,
    pub snapshot: String,
}

impl IntoResponse for PendingOrdersResponse {
    fn into_response(self) -> Response {
        (StatusCode::ACCEPTED, Json(self)).into_response()
    }
}

/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, ApiResponse<Order>), AppError> {
    let order = state.orders().place_order(&current, &req).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(order)))
}

/// GET /api/orders
pub async fn list_orders(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Vec<Order>> {
    let orders = state.orders().list_customer_orders(&current).await?;
    Ok(ApiResponse::success(orders))
}

/// GET /api/ordersOwner
pub async fn list_pending(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<PendingOrdersResponse, AppError> {
    let queue = state.orders().list_seller_pending(&current).await?;
    let (orders, snapshot) = queue.into_parts();
    Ok(PendingOrdersResponse {
        code: 0,
        message: format!("{} pending order(s)", orders.len()),
        data: orders,
        snapshot,
    })
}

/// PATCH /api/ordersOwner/{position}/accept
pub async fn accept_order(
    state: State<AppState>,
    current: CurrentUser,
    Path(position): Path<String>,
    query: Query<ResolveQuery>,
) -> Result<(StatusCode, ApiResponse<Order>), AppError> {
    resolve(state, current, &position, query, OrderOutcome::Accept).await
}

/// PATCH /api/ordersOwner/{position}/cancel
pub async fn cancel_order(
    state: State<AppState>,
    current: CurrentUser,
    Path(position): Path<String>,
    query: Query<ResolveQuery>,
) -> Result<(StatusCode, ApiResponse<Order>), AppError> {
    resolve(state, current, &position, query, OrderOutcome::Cancel).await
}

/// 1-based queue position from the path segment
fn parse_position(raw: &str) -> Result<usize, AppError> {
    raw.parse::<usize>().map_err(|_| {
        AppError::with_message(
            ErrorCode::PositionOutOfRange,
            format!("Position must be a positive whole number, got {raw:?}"),
        )
        .with_detail("position", raw)
    })
}

async fn resolve(
    State(state): State<AppState>,
    current: CurrentUser,
    raw_position: &str,
    Query(query): Query<ResolveQuery>,
    outcome: OrderOutcome,
) -> Result<(StatusCode, ApiResponse<Order>), AppError> {
    let position = parse_position(raw_position)?;
    let order = state
        .orders()
        .resolve_order(&current, position, outcome, query.snapshot.as_deref())
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message(outcome.message(), order),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_must_be_unsigned() {
        assert_eq!(parse_position("3").unwrap(), 3);
        for raw in ["-1", "first", "", "1.5"] {
            let err = parse_position(raw).unwrap_err();
            assert_eq!(err.code, ErrorCode::PositionOutOfRange, "{raw}");
            assert_eq!(err.details.unwrap()["position"], raw);
        }
    }
}
