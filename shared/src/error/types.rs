//! `AppError` and the JSON envelope every endpoint answers with

use std::collections::BTreeMap;

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::category::ErrorCategory;
use super::codes::ErrorCode;

/// Structured detail entries attached to an error (`remaining`, `position`, ...)
pub type ErrorDetails = BTreeMap<String, Value>;

/// Client-facing failure: a stable [`ErrorCode`], the message shown to the
/// caller and optional machine-readable details.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<ErrorDetails>,
}

impl AppError {
    /// Error carrying the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach one detail entry
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// `"{resource} not found"` with the resource echoed in the details
    pub fn not_found(resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{resource} not found"))
            .with_detail("resource", resource)
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Caller is signed in but did not create the resource
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// No credentials on the request
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    /// Requested quantity exceeds stock. The message names the menu and
    /// what is left of it.
    pub fn insufficient_stock(menu_name: &str, remaining: i32) -> Self {
        Self::with_message(
            ErrorCode::InsufficientStock,
            format!("Only {remaining} left of {menu_name}"),
        )
        .with_detail("menu_name", menu_name)
        .with_detail("remaining", remaining)
    }
}

/// Response envelope.
///
/// Success: `{code: 0, message, data?}`. Failure: `{code, message, details?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::success_with_message("OK", data)
    }

    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            code: Some(ErrorCode::Success.code()),
            message: message.into(),
            data: Some(data),
            details: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload, e.g. after a delete
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: Some(ErrorCode::Success.code()),
            message: message.into(),
            data: None,
            details: None,
        }
    }

    pub fn error(err: &AppError) -> Self {
        err.clone().into()
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message,
            data: None,
            details: err.details,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.code.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "System error");
        }
        (self.http_status(), Json(ApiResponse::<()>::from(self))).into_response()
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = match self.code.map(ErrorCode::try_from) {
            None | Some(Ok(ErrorCode::Success)) => StatusCode::OK,
            Some(Ok(code)) => code.http_status(),
            Some(Err(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_message_comes_from_code() {
        let err = AppError::new(ErrorCode::NoPendingOrders);
        assert_eq!(err.code, ErrorCode::NoPendingOrders);
        assert_eq!(err.message, "There are no pending orders");
        assert!(err.details.is_none());
    }

    #[test]
    fn insufficient_stock_reports_name_and_remaining() {
        let err = AppError::insufficient_stock("Kimchi Stew", 2);
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("Kimchi Stew"));
        assert!(err.message.contains('2'));

        let details = err.details.unwrap();
        assert_eq!(details["menu_name"], "Kimchi Stew");
        assert_eq!(details["remaining"], 2);
    }

    #[test]
    fn not_found_has_resource_detail() {
        let err = AppError::not_found("Menu 7");
        assert_eq!(err.message, "Menu 7 not found");
        assert!(err.details.as_ref().unwrap().contains_key("resource"));
    }

    #[test]
    fn error_envelope() {
        let err = AppError::with_message(ErrorCode::OrderNotFound, "Order 3 not found");
        let response = ApiResponse::<()>::error(&err);

        assert_eq!(response.code, Some(4001));
        assert_eq!(response.message, "Order 3 not found");
        assert!(response.data.is_none());
    }

    #[test]
    fn success_envelope_skips_empty_fields() {
        let response = ApiResponse::success_with_message("Order accepted", 42);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["message"], "Order accepted");
        assert_eq!(json["data"], 42);
        assert!(json.get("details").is_none());
    }

    #[test]
    fn error_status_follows_code() {
        let resp = AppError::new(ErrorCode::PendingQueueChanged).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}
