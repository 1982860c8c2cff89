//! HTTP API for the food server
//!
//! Every resource route lives under `/api`; `/health` stays at the root.

pub mod account;
pub mod category;
pub mod health;
pub mod logging;
pub mod menu;
pub mod order;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use shared::error::{ApiResponse, AppError};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::state::AppState;

pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Fresh UUID v4 for requests that arrive without `x-request-id`
#[derive(Clone)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Every route, without middleware or state. Tests drive this through
/// [`build_app`].
pub fn build_router() -> Router<AppState> {
    let api = Router::new()
        .merge(account::router())
        .merge(category::router())
        .merge(menu::router())
        .merge(order::router());

    Router::new().nest("/api", api).merge(health::router())
}

/// Router with middleware and state attached.
///
/// Layers run outermost first: request id assignment, tracing, request
/// logging, compression, CORS.
pub fn build_app(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    build_router()
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(axum_middleware::from_fn(logging::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, UuidRequestId))
        .with_state(state)
}
