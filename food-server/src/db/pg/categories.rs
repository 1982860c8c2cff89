//! Category database operations

use shared::models::{Category, CategoryCreate, CategoryUpdate, User};
use sqlx::PgPool;

use super::begin_read_committed;
use crate::db::{RepoError, RepoResult};

pub async fn create(
    pool: &PgPool,
    owner: &User,
    data: &CategoryCreate,
    now: i64,
) -> RepoResult<Category> {
    let category = sqlx::query_as(
        "INSERT INTO categories (user_id, name, display_order, author, created_at, updated_at)
         VALUES ($1, $2, (SELECT COALESCE(MAX(display_order), 0) + 1 FROM categories), $3, $4, $4)
         RETURNING *",
    )
    .bind(owner.user_id)
    .bind(&data.name)
    .bind(&owner.nickname)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(category)
}

pub async fn list(pool: &PgPool) -> RepoResult<Vec<Category>> {
    let list = sqlx::query_as(
        "SELECT * FROM categories WHERE deleted_at IS NULL ORDER BY display_order, category_id",
    )
    .fetch_all(pool)
    .await?;
    Ok(list)
}

pub async fn find(pool: &PgPool, category_id: i64) -> RepoResult<Option<Category>> {
    let category =
        sqlx::query_as("SELECT * FROM categories WHERE category_id = $1 AND deleted_at IS NULL")
            .bind(category_id)
            .fetch_optional(pool)
            .await?;
    Ok(category)
}

/// Rename and/or move. Moving onto a taken slot shifts that slot and every
/// later one down by one.
pub async fn update(
    pool: &PgPool,
    category_id: i64,
    data: &CategoryUpdate,
    now: i64,
) -> RepoResult<Category> {
    let mut tx = begin_read_committed(pool).await?;

    let exists: Option<(i64,)> = sqlx::query_as(
        "SELECT category_id FROM categories
         WHERE category_id = $1 AND deleted_at IS NULL
         FOR UPDATE",
    )
    .bind(category_id)
    .fetch_optional(&mut *tx)
    .await?;
    if exists.is_none() {
        return Err(RepoError::NotFound(format!("Category {category_id}")));
    }

    if let Some(target) = data.order {
        let taken: Option<(i64,)> = sqlx::query_as(
            "SELECT category_id FROM categories
             WHERE display_order = $1 AND category_id <> $2
             LIMIT 1",
        )
        .bind(target)
        .bind(category_id)
        .fetch_optional(&mut *tx)
        .await?;

        if taken.is_some() {
            sqlx::query(
                "UPDATE categories SET display_order = display_order + 1, updated_at = $2
                 WHERE display_order >= $1",
            )
            .bind(target)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
    }

    let category = sqlx::query_as(
        "UPDATE categories
         SET name = COALESCE($1, name),
             display_order = COALESCE($2, display_order),
             updated_at = $3
         WHERE category_id = $4
         RETURNING *",
    )
    .bind(data.name.as_deref())
    .bind(data.order)
    .bind(now)
    .bind(category_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(category)
}

/// Soft-delete the category together with its menus
pub async fn delete(pool: &PgPool, category_id: i64, now: i64) -> RepoResult<()> {
    let mut tx = begin_read_committed(pool).await?;

    let result = sqlx::query(
        "UPDATE categories SET deleted_at = $1
         WHERE category_id = $2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(category_id)
    .execute(&mut *tx)
    .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {category_id}")));
    }

    let menus = sqlx::query(
        "UPDATE menus SET deleted_at = $1
         WHERE category_id = $2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(category_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::debug!(
        category_id,
        menus = menus.rows_affected(),
        "Category soft-deleted"
    );
    Ok(())
}
