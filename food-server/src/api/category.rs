//! Category endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use http::StatusCode;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Category, CategoryCreate, CategoryUpdate, UserRole};

use super::ApiResult;
use crate::auth::{CurrentUser, require_author, require_role};
use crate::error::ServiceError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", post(create_category).get(list_categories))
        .route(
            "/categories/{category_id}",
            post(update_category).delete(delete_category),
        )
}

/// Load a live category or fail with `CategoryNotFound`
pub(super) async fn load_category(
    state: &AppState,
    category_id: i64,
) -> Result<Category, AppError> {
    state
        .store
        .find_category(category_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::CategoryNotFound,
                format!("Category {category_id} does not exist"),
            )
        })
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<CategoryCreate>,
) -> Result<(StatusCode, ApiResponse<Category>), AppError> {
    require_role(&current, UserRole::Owner)?;
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Category name must not be empty"));
    }

    let owner = state
        .store
        .find_user(current.id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let category = state
        .store
        .create_category(&owner, &req)
        .await
        .map_err(ServiceError::from)?;

    tracing::info!(category_id = category.category_id, "Category created");
    Ok((StatusCode::CREATED, ApiResponse::success(category)))
}

/// GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = state
        .store
        .list_categories()
        .await
        .map_err(ServiceError::from)?;
    Ok(ApiResponse::success(categories))
}

/// POST /api/categories/{category_id}
pub async fn update_category(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(category_id): Path<i64>,
    Json(req): Json<CategoryUpdate>,
) -> Result<(StatusCode, ApiResponse<Category>), AppError> {
    require_role(&current, UserRole::Owner)?;
    if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::validation("Category name must not be empty"));
    }
    if req.order.is_some_and(|o| o < 1) {
        return Err(AppError::validation("Category order starts at 1"));
    }

    let category = load_category(&state, category_id).await?;
    require_author(&current, category.user_id)?;

    let category = state
        .store
        .update_category(category_id, &req)
        .await
        .map_err(ServiceError::from)?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("Category updated", category),
    ))
}

/// DELETE /api/categories/{category_id}
pub async fn delete_category(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(category_id): Path<i64>,
) -> ApiResult<()> {
    let category = load_category(&state, category_id).await?;
    require_author(&current, category.user_id)?;

    state
        .store
        .delete_category(category_id)
        .await
        .map_err(ServiceError::from)?;

    tracing::info!(category_id, "Category deleted");
    Ok(ApiResponse::message("Category deleted"))
}
