//! Unified error codes for the food ordering service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog (category / menu) errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 values on the wire so clients can switch on them
/// without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (nickname/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Token subject no longer exists
    UserNotFound = 1005,
    /// Nickname already taken
    NicknameExists = 1006,

    // ==================== 2xxx: Permission ====================
    /// Caller is not the author of the resource
    PermissionDenied = 2001,
    /// Operation requires a different account role
    RoleRequired = 2002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Menu stock is below the requested quantity
    InsufficientStock = 4002,
    /// Seller has no pending orders
    NoPendingOrders = 4003,
    /// Order already left the PENDING state
    OrderAlreadyResolved = 4004,
    /// Pending queue no longer matches the snapshot the client saw
    PendingQueueChanged = 4005,
    /// Quantity must be at least 1
    InvalidQuantity = 4006,
    /// Ordered menu does not exist
    OrderMenuUnavailable = 4007,
    /// Queue position outside the pending list
    PositionOutOfRange = 4008,
    /// Menu stock changed between read and write
    StockChanged = 4009,

    // ==================== 6xxx: Catalog ====================
    /// Menu not found
    MenuNotFound = 6001,
    /// Menu price outside the accepted range
    MenuInvalidPrice = 6002,
    /// Category not found
    CategoryNotFound = 6101,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid nickname or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::UserNotFound => "Token user does not exist",
            ErrorCode::NicknameExists => "Nickname is already taken",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "This account type cannot perform the operation",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::InsufficientStock => "Not enough stock for the requested quantity",
            ErrorCode::NoPendingOrders => "There are no pending orders",
            ErrorCode::OrderAlreadyResolved => "Order has already been accepted or cancelled",
            ErrorCode::PendingQueueChanged => "Pending orders changed, refresh the list",
            ErrorCode::InvalidQuantity => "Order at least one item",
            ErrorCode::OrderMenuUnavailable => "The ordered menu does not exist",
            ErrorCode::PositionOutOfRange => "No pending order at that position",
            ErrorCode::StockChanged => "Menu stock changed while ordering, try again",

            // Catalog
            ErrorCode::MenuNotFound => "Menu not found",
            ErrorCode::MenuInvalidPrice => "Menu price must be between 1 and 1000000",
            ErrorCode::CategoryNotFound => "Category not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            4 => ErrorCode::AlreadyExists,
            5 => ErrorCode::InvalidRequest,

            1001 => ErrorCode::NotAuthenticated,
            1002 => ErrorCode::InvalidCredentials,
            1003 => ErrorCode::TokenExpired,
            1004 => ErrorCode::TokenInvalid,
            1005 => ErrorCode::UserNotFound,
            1006 => ErrorCode::NicknameExists,

            2001 => ErrorCode::PermissionDenied,
            2002 => ErrorCode::RoleRequired,

            4001 => ErrorCode::OrderNotFound,
            4002 => ErrorCode::InsufficientStock,
            4003 => ErrorCode::NoPendingOrders,
            4004 => ErrorCode::OrderAlreadyResolved,
            4005 => ErrorCode::PendingQueueChanged,
            4006 => ErrorCode::InvalidQuantity,
            4007 => ErrorCode::OrderMenuUnavailable,
            4008 => ErrorCode::PositionOutOfRange,
            4009 => ErrorCode::StockChanged,

            6001 => ErrorCode::MenuNotFound,
            6002 => ErrorCode::MenuInvalidPrice,
            6101 => ErrorCode::CategoryNotFound,

            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::DatabaseError,
            9003 => ErrorCode::ConfigError,

            _ => return Err(InvalidErrorCode(value)),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::RoleRequired.code(), 2002);
        assert_eq!(ErrorCode::InsufficientStock.code(), 4002);
        assert_eq!(ErrorCode::NoPendingOrders.code(), 4003);
        assert_eq!(ErrorCode::MenuNotFound.code(), 6001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1006), Ok(ErrorCode::NicknameExists));
        assert_eq!(ErrorCode::try_from(4005), Ok(ErrorCode::PendingQueueChanged));
        assert_eq!(ErrorCode::try_from(6101), Ok(ErrorCode::CategoryNotFound));
        assert_eq!(ErrorCode::try_from(9003), Ok(ErrorCode::ConfigError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::InsufficientStock).unwrap();
        assert_eq!(json, "4002");

        let code: ErrorCode = serde_json::from_str("4003").unwrap();
        assert_eq!(code, ErrorCode::NoPendingOrders);

        let result: Result<ErrorCode, _> = serde_json::from_str("10000");
        assert!(result.is_err());
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(
            ErrorCode::NoPendingOrders.message(),
            "There are no pending orders"
        );
    }
}
