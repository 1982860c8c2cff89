//! JWT Extractor
//!
//! Validates the bearer token and resolves the caller into a [`CurrentUser`].
//! The token is read from the `Authorization` header, falling back to the
//! `authorization` cookie set at sign-in.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::{AppError, ErrorCode};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::error::ServiceError;
use crate::state::AppState;

const AUTH_COOKIE: &str = "authorization";

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        let raw = match header.or_else(|| cookie_token(parts)) {
            Some(raw) => raw,
            None => {
                tracing::debug!(uri = %parts.uri, "Missing credentials");
                return Err(AppError::unauthorized());
            }
        };

        let token = JwtService::extract_from_header(&raw)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization format"))?;

        let claims = state.jwt.validate_token(token).map_err(|e| {
            tracing::warn!(error = %e, uri = %parts.uri, "Token validation failed");
            match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })?;

        let user_id = claims
            .user_id()
            .map_err(|e| AppError::invalid_token(e.to_string()))?;

        // Role comes from the stored account, not the token
        let user = state
            .store
            .find_user(user_id)
            .await
            .map_err(|e| AppError::from(ServiceError::from(e)))?
            .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

        let current = CurrentUser::from(user);
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}

/// `authorization` cookie value, URL-decoded (`Bearer%20<token>`)
fn cookie_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE)
        .map(|(_, value)| value.replace("%20", " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts_with_cookie(cookie: &str) -> Parts {
        let (parts, _) = http::Request::builder()
            .header(http::header::COOKIE, cookie)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn reads_encoded_cookie() {
        let parts = parts_with_cookie("theme=dark; authorization=Bearer%20abc.def");
        assert_eq!(cookie_token(&parts).as_deref(), Some("Bearer abc.def"));
    }

    #[test]
    fn missing_cookie() {
        let parts = parts_with_cookie("theme=dark");
        assert_eq!(cookie_token(&parts), None);
    }
}
