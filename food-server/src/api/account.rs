//! Account endpoints: sign-up, sign-in, my info, sign-off

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{delete, get, post},
};
use http::{StatusCode, header};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{
    NICKNAME_MAX_LEN, NICKNAME_MIN_LEN, SignInRequest, SignInResponse, SignUpRequest, User,
};

use super::ApiResult;
use crate::auth::CurrentUser;
use crate::db::RepoError;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
        .route("/myInfo", get(my_info))
        .route("/sign-off", delete(sign_off))
}

fn auth_cookie(token: &str) -> String {
    format!("authorization=Bearer%20{token}; Path=/; HttpOnly; SameSite=Lax")
}

const CLEARED_AUTH_COOKIE: &str = "authorization=; Path=/; HttpOnly; Max-Age=0";

/// POST /api/sign-up
pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, ApiResponse<User>), AppError> {
    let nickname = req.nickname.trim();
    let len = nickname.chars().count();
    if !(NICKNAME_MIN_LEN..=NICKNAME_MAX_LEN).contains(&len) {
        return Err(AppError::validation(format!(
            "Nickname must be {NICKNAME_MIN_LEN} to {NICKNAME_MAX_LEN} characters"
        )));
    }
    if req.password.is_empty() {
        return Err(AppError::validation("Password must not be empty"));
    }

    let hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("Password hashing failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let user = match state
        .store
        .create_user(nickname, &hash, req.user_type)
        .await
    {
        Ok(user) => user,
        Err(RepoError::Duplicate(_)) => return Err(AppError::new(ErrorCode::NicknameExists)),
        Err(e) => return Err(ServiceError::from(e).into()),
    };

    tracing::info!(user_id = user.user_id, role = %user.user_type, "Account created");
    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("Sign-up complete", user),
    ))
}

/// POST /api/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<impl IntoResponse, AppError> {
    let credentials = state
        .store
        .find_credentials(req.nickname.trim())
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::InvalidCredentials, "Nickname does not exist")
        })?;

    if !verify_password(&req.password, &credentials.password_hash) {
        return Err(AppError::with_message(
            ErrorCode::InvalidCredentials,
            "Password does not match",
        ));
    }

    let user = credentials.user;
    let token = state
        .jwt
        .generate_token(user.user_id, &user.nickname, user.user_type)
        .map_err(|e| {
            tracing::error!("JWT creation failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    let message = format!(
        "{} ({}) signed in",
        user.nickname,
        user.user_type.greeting()
    );
    tracing::info!(user_id = user.user_id, "Signed in");

    Ok((
        [(header::SET_COOKIE, auth_cookie(&token))],
        ApiResponse::success_with_message(message, SignInResponse { token, user }),
    ))
}

/// GET /api/myInfo
pub async fn my_info(State(state): State<AppState>, current: CurrentUser) -> ApiResult<User> {
    let user = state
        .store
        .find_user(current.id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(ApiResponse::success(user))
}

/// DELETE /api/sign-off
pub async fn sign_off(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    match state.store.delete_user(current.id).await {
        Ok(()) => {}
        Err(RepoError::NotFound(_)) => {
            return Err(AppError::with_message(
                ErrorCode::UserNotFound,
                "Account already removed or does not exist",
            ));
        }
        Err(e) => return Err(ServiceError::from(e).into()),
    }

    tracing::info!(user_id = current.id, "Account removed");
    Ok((
        [(header::SET_COOKIE, CLEARED_AUTH_COOKIE)],
        ApiResponse::message(format!("{}'s account was removed", current.nickname)),
    ))
}
