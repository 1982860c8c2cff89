//! User database operations

use shared::models::{User, UserRole};
use sqlx::PgPool;

use crate::db::{RepoError, RepoResult, UserCredentials};

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: i64,
    nickname: String,
    password_hash: String,
    user_type: String,
    created_at: i64,
    updated_at: i64,
}

impl UserRow {
    fn into_credentials(self) -> UserCredentials {
        UserCredentials {
            user: User {
                user_id: self.user_id,
                nickname: self.nickname,
                user_type: UserRole::from_db(&self.user_type),
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            password_hash: self.password_hash,
        }
    }
}

pub async fn create(
    pool: &PgPool,
    nickname: &str,
    password_hash: &str,
    role: UserRole,
    now: i64,
) -> RepoResult<User> {
    let row: UserRow = sqlx::query_as(
        "INSERT INTO users (nickname, password_hash, user_type, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $4)
         RETURNING *",
    )
    .bind(nickname)
    .bind(password_hash)
    .bind(role.as_str())
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!("nickname {nickname}")),
        other => other,
    })?;
    Ok(row.into_credentials().user)
}

pub async fn find_by_nickname(
    pool: &PgPool,
    nickname: &str,
) -> RepoResult<Option<UserCredentials>> {
    let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE nickname = $1")
        .bind(nickname)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(UserRow::into_credentials))
}

pub async fn find_by_id(pool: &PgPool, user_id: i64) -> RepoResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.into_credentials().user))
}

pub async fn delete(pool: &PgPool, user_id: i64) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {user_id}")));
    }
    Ok(())
}
