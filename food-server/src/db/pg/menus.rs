//! Menu database operations

use shared::models::{Menu, MenuCreate, MenuStatus, MenuUpdate, User};
use sqlx::{PgConnection, PgPool};

use super::begin_read_committed;
use crate::db::{RepoError, RepoResult, apply_menu_update};

#[derive(sqlx::FromRow)]
pub(super) struct MenuRow {
    menu_id: i64,
    user_id: i64,
    category_id: i64,
    name: String,
    description: String,
    image: Option<String>,
    price: i64,
    quantity: i32,
    status: String,
    display_order: i32,
    author: String,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
}

impl From<MenuRow> for Menu {
    fn from(row: MenuRow) -> Self {
        Menu {
            menu_id: row.menu_id,
            user_id: row.user_id,
            category_id: row.category_id,
            name: row.name,
            description: row.description,
            image: row.image,
            price: row.price,
            quantity: row.quantity,
            status: MenuStatus::from_db(&row.status),
            order: row.display_order,
            author: row.author,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

pub async fn create(
    pool: &PgPool,
    owner: &User,
    category_id: i64,
    data: &MenuCreate,
    now: i64,
) -> RepoResult<Menu> {
    let mut tx = begin_read_committed(pool).await?;

    let category: Option<(i64,)> = sqlx::query_as(
        "SELECT category_id FROM categories WHERE category_id = $1 AND deleted_at IS NULL",
    )
    .bind(category_id)
    .fetch_optional(&mut *tx)
    .await?;
    if category.is_none() {
        return Err(RepoError::NotFound(format!("Category {category_id}")));
    }

    let row: MenuRow = sqlx::query_as(
        "INSERT INTO menus (
            user_id, category_id, name, description, image, price,
            quantity, status, display_order, author, created_at, updated_at
         )
         VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8,
            (SELECT COALESCE(MAX(display_order), 0) + 1 FROM menus),
            $9, $10, $10
         )
         RETURNING *",
    )
    .bind(owner.user_id)
    .bind(category_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.image.as_deref())
    .bind(data.price)
    .bind(data.quantity)
    .bind(MenuStatus::for_stock(data.quantity).as_str())
    .bind(&owner.nickname)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(row.into())
}

pub async fn list_by_category(pool: &PgPool, category_id: i64) -> RepoResult<Vec<Menu>> {
    let rows: Vec<MenuRow> = sqlx::query_as(
        "SELECT * FROM menus
         WHERE category_id = $1 AND deleted_at IS NULL
         ORDER BY display_order, menu_id",
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Menu::from).collect())
}

pub async fn find(pool: &PgPool, menu_id: i64) -> RepoResult<Option<Menu>> {
    let row: Option<MenuRow> =
        sqlx::query_as("SELECT * FROM menus WHERE menu_id = $1 AND deleted_at IS NULL")
            .bind(menu_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(Menu::from))
}

/// Lock a menu row inside a transaction, soft-deleted rows included
pub(super) async fn lock(conn: &mut PgConnection, menu_id: i64) -> RepoResult<Option<Menu>> {
    let row: Option<MenuRow> =
        sqlx::query_as("SELECT * FROM menus WHERE menu_id = $1 FOR UPDATE")
            .bind(menu_id)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(row.map(Menu::from))
}

pub async fn update(
    pool: &PgPool,
    menu_id: i64,
    data: &MenuUpdate,
    now: i64,
) -> RepoResult<Menu> {
    let mut tx = begin_read_committed(pool).await?;

    let mut menu = lock(&mut *tx, menu_id)
        .await?
        .filter(|m| !m.is_deleted())
        .ok_or_else(|| RepoError::NotFound(format!("Menu {menu_id}")))?;

    if let Some(target) = data.order {
        let taken: Option<(i64,)> = sqlx::query_as(
            "SELECT menu_id FROM menus WHERE display_order = $1 AND menu_id <> $2 LIMIT 1",
        )
        .bind(target)
        .bind(menu_id)
        .fetch_optional(&mut *tx)
        .await?;

        if taken.is_some() {
            sqlx::query(
                "UPDATE menus SET display_order = display_order + 1, updated_at = $2
                 WHERE display_order >= $1",
            )
            .bind(target)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
    }

    apply_menu_update(&mut menu, data);

    let row: MenuRow = sqlx::query_as(
        "UPDATE menus
         SET name = $1, description = $2, image = $3, price = $4,
             display_order = $5, status = $6, quantity = $7, updated_at = $8
         WHERE menu_id = $9
         RETURNING *",
    )
    .bind(&menu.name)
    .bind(&menu.description)
    .bind(menu.image.as_deref())
    .bind(menu.price)
    .bind(menu.order)
    .bind(menu.status.as_str())
    .bind(menu.quantity)
    .bind(now)
    .bind(menu_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(row.into())
}

pub async fn delete(pool: &PgPool, menu_id: i64, now: i64) -> RepoResult<()> {
    let result =
        sqlx::query("UPDATE menus SET deleted_at = $1 WHERE menu_id = $2 AND deleted_at IS NULL")
            .bind(now)
            .bind(menu_id)
            .execute(pool)
            .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu {menu_id}")));
    }
    Ok(())
}
