//! Caller identity and capability checks

use shared::error::{AppError, ErrorCode};
use shared::models::{User, UserRole};

/// Authenticated caller, resolved once per request from the token subject
/// and the stored account.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub nickname: String,
    pub role: UserRole,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.user_id,
            nickname: user.nickname,
            role: user.user_type,
        }
    }
}

/// Caller must hold `role`
pub fn require_role(user: &CurrentUser, role: UserRole) -> Result<(), AppError> {
    if user.role == role {
        return Ok(());
    }
    let message = match role {
        UserRole::Owner => "Only owner accounts can do this",
        UserRole::Customer => "Only customer accounts can do this",
    };
    Err(AppError::with_message(ErrorCode::RoleRequired, message)
        .with_detail("required_role", role.as_str()))
}

/// Caller must be the account that created the resource
pub fn require_author(user: &CurrentUser, owner_id: i64) -> Result<(), AppError> {
    if user.id == owner_id {
        Ok(())
    } else {
        Err(AppError::permission_denied(
            "Only the author can change this resource",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, role: UserRole) -> CurrentUser {
        CurrentUser {
            id,
            nickname: "kim".into(),
            role,
        }
    }

    #[test]
    fn role_gate() {
        assert!(require_role(&user(1, UserRole::Owner), UserRole::Owner).is_ok());

        let err = require_role(&user(1, UserRole::Customer), UserRole::Owner).unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleRequired);
        assert_eq!(err.http_status(), http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn author_gate() {
        assert!(require_author(&user(3, UserRole::Owner), 3).is_ok());
        let err = require_author(&user(3, UserRole::Owner), 4).unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }
}
