//! Menu endpoints, nested under a category

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use http::StatusCode;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{MENU_MAX_PRICE, MENU_MIN_PRICE, Menu, MenuCreate, MenuUpdate, UserRole};

use super::ApiResult;
use super::category::load_category;
use crate::auth::{CurrentUser, require_author, require_role};
use crate::error::ServiceError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/categories/{category_id}/menus",
            post(create_menu).get(list_menus),
        )
        .route(
            "/categories/{category_id}/menus/{menu_id}",
            get(get_menu).patch(update_menu).delete(delete_menu),
        )
}

fn check_price(price: i64) -> Result<(), AppError> {
    if (MENU_MIN_PRICE..=MENU_MAX_PRICE).contains(&price) {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::MenuInvalidPrice).with_detail("price", price))
    }
}

fn check_stock(quantity: i32) -> Result<(), AppError> {
    if quantity < 0 {
        return Err(AppError::validation("Stock quantity must not be negative"));
    }
    Ok(())
}

/// Live menu that belongs to `category_id`
async fn load_menu(state: &AppState, category_id: i64, menu_id: i64) -> Result<Menu, AppError> {
    state
        .store
        .find_menu(menu_id)
        .await
        .map_err(ServiceError::from)?
        .filter(|m| m.category_id == category_id)
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::MenuNotFound,
                format!("Menu {menu_id} does not exist"),
            )
        })
}

/// POST /api/categories/{category_id}/menus
pub async fn create_menu(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(category_id): Path<i64>,
    Json(req): Json<MenuCreate>,
) -> Result<(StatusCode, ApiResponse<Menu>), AppError> {
    require_role(&current, UserRole::Owner)?;
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Menu name must not be empty"));
    }
    check_price(req.price)?;
    check_stock(req.quantity)?;

    load_category(&state, category_id).await?;

    let owner = state
        .store
        .find_user(current.id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let menu = state
        .store
        .create_menu(&owner, category_id, &req)
        .await
        .map_err(ServiceError::from)?;

    tracing::info!(menu_id = menu.menu_id, category_id, stock = menu.quantity, "Menu created");
    Ok((StatusCode::CREATED, ApiResponse::success(menu)))
}

/// GET /api/categories/{category_id}/menus
pub async fn list_menus(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> ApiResult<Vec<Menu>> {
    let menus = state
        .store
        .list_menus(category_id)
        .await
        .map_err(ServiceError::from)?;
    Ok(ApiResponse::success(menus))
}

/// GET /api/categories/{category_id}/menus/{menu_id}
pub async fn get_menu(
    State(state): State<AppState>,
    Path((category_id, menu_id)): Path<(i64, i64)>,
) -> ApiResult<Menu> {
    let menu = load_menu(&state, category_id, menu_id).await?;
    Ok(ApiResponse::success(menu))
}

/// PATCH /api/categories/{category_id}/menus/{menu_id}
pub async fn update_menu(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((category_id, menu_id)): Path<(i64, i64)>,
    Json(req): Json<MenuUpdate>,
) -> Result<(StatusCode, ApiResponse<Menu>), AppError> {
    require_role(&current, UserRole::Owner)?;
    if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::validation("Menu name must not be empty"));
    }
    if let Some(price) = req.price {
        check_price(price)?;
    }
    if let Some(quantity) = req.quantity {
        check_stock(quantity)?;
    }
    if req.order.is_some_and(|o| o < 1) {
        return Err(AppError::validation("Menu order starts at 1"));
    }

    let menu = load_menu(&state, category_id, menu_id).await?;
    require_author(&current, menu.user_id)?;

    let menu = state
        .store
        .update_menu(menu_id, &req)
        .await
        .map_err(ServiceError::from)?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("Menu updated", menu),
    ))
}

/// DELETE /api/categories/{category_id}/menus/{menu_id}
pub async fn delete_menu(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((category_id, menu_id)): Path<(i64, i64)>,
) -> ApiResult<()> {
    let menu = load_menu(&state, category_id, menu_id).await?;
    require_author(&current, menu.user_id)?;

    state
        .store
        .delete_menu(menu_id)
        .await
        .map_err(ServiceError::from)?;

    tracing::info!(menu_id, "Menu deleted");
    Ok(ApiResponse::message("Menu deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_bounds_are_inclusive() {
        assert!(check_price(1).is_ok());
        assert!(check_price(1_000_000).is_ok());
        assert_eq!(check_price(0).unwrap_err().code, ErrorCode::MenuInvalidPrice);
        assert_eq!(
            check_price(1_000_001).unwrap_err().code,
            ErrorCode::MenuInvalidPrice
        );
    }
}
