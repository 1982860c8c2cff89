//! User Model

use serde::{Deserialize, Serialize};

/// Account type, fixed at sign-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Customer,
    Owner,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "CUSTOMER",
            Self::Owner => "OWNER",
        }
    }

    /// Parse the stored column value; unknown values fall back to `Customer`,
    /// the role with the fewest capabilities.
    pub fn from_db(s: &str) -> Self {
        match s {
            "OWNER" => Self::Owner,
            _ => Self::Customer,
        }
    }

    /// Honorific used in the sign-in greeting
    pub fn greeting(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Owner => "owner",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User entity (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i64,
    pub nickname: String,
    pub user_type: UserRole,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Sign-up payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub nickname: String,
    pub password: String,
    pub user_type: UserRole,
}

/// Sign-in payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub nickname: String,
    pub password: String,
}

/// Sign-in result: the bearer token is also set as the `authorization` cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub token: String,
    pub user: User,
}

pub const NICKNAME_MIN_LEN: usize = 3;
pub const NICKNAME_MAX_LEN: usize = 20;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_format() {
        assert_eq!(
            serde_json::to_string(&UserRole::Owner).unwrap(),
            "\"OWNER\""
        );
        let role: UserRole = serde_json::from_str("\"CUSTOMER\"").unwrap();
        assert_eq!(role, UserRole::Customer);
        assert!(serde_json::from_str::<UserRole>("\"ADMIN\"").is_err());
    }

    #[test]
    fn role_from_db() {
        assert_eq!(UserRole::from_db("OWNER"), UserRole::Owner);
        assert_eq!(UserRole::from_db("CUSTOMER"), UserRole::Customer);
        assert_eq!(UserRole::from_db("garbage"), UserRole::Customer);
    }

    #[test]
    fn sign_up_accepts_camel_case() {
        let req: SignUpRequest = serde_json::from_str(
            r#"{"nickname":"kim","password":"pw1234","userType":"OWNER"}"#,
        )
        .unwrap();
        assert_eq!(req.user_type, UserRole::Owner);
    }
}
