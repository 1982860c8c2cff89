//! Inventory ledger persistence
//!
//! Writes the stock changes computed by [`crate::inventory`]. Both functions
//! run on a caller-owned transaction so the paired order write commits with
//! them.

use sqlx::PgConnection;

use super::menus;
use crate::db::{RepoError, RepoResult};
use crate::inventory::{self, StockChange};

/// Persist a reservation if the menu still holds `change.previous`.
///
/// Compare-and-swap on the stock column: a concurrent placement that
/// committed first makes this write a no-op and the call returns `Conflict`.
pub async fn apply_reservation(
    conn: &mut PgConnection,
    change: &StockChange,
    now: i64,
) -> RepoResult<()> {
    let result = sqlx::query(
        "UPDATE menus SET quantity = $1, status = $2, updated_at = $3
         WHERE menu_id = $4 AND quantity = $5 AND deleted_at IS NULL",
    )
    .bind(change.quantity)
    .bind(change.status.as_str())
    .bind(now)
    .bind(change.menu_id)
    .bind(change.previous)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 1 {
        return Ok(());
    }

    let live: Option<(i32,)> =
        sqlx::query_as("SELECT quantity FROM menus WHERE menu_id = $1 AND deleted_at IS NULL")
            .bind(change.menu_id)
            .fetch_optional(&mut *conn)
            .await?;

    Err(match live {
        None => RepoError::NotFound(format!("Menu {}", change.menu_id)),
        Some((stock,)) => RepoError::Conflict(format!(
            "menu {} stock is {stock}, expected {}",
            change.menu_id, change.previous
        )),
    })
}

/// Add `quantity` back to a menu and mark it `FOR_SALE`.
pub async fn release(
    conn: &mut PgConnection,
    menu_id: i64,
    quantity: i32,
    now: i64,
) -> RepoResult<StockChange> {
    let menu = menus::lock(conn, menu_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu {menu_id}")))?;

    let change =
        inventory::release(&menu, quantity).map_err(|e| RepoError::Validation(e.to_string()))?;

    sqlx::query("UPDATE menus SET quantity = $1, status = $2, updated_at = $3 WHERE menu_id = $4")
        .bind(change.quantity)
        .bind(change.status.as_str())
        .bind(now)
        .bind(menu_id)
        .execute(&mut *conn)
        .await?;

    Ok(change)
}
