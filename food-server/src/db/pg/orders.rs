//! Order database operations

use shared::models::{NewOrder, Order, OrderOutcome, OrderState};
use sqlx::PgPool;

use super::{begin_read_committed, ledger};
use crate::db::{RepoError, RepoResult};
use crate::inventory::StockChange;

#[derive(sqlx::FromRow)]
struct OrderRow {
    order_id: i64,
    customer_id: i64,
    menu_id: i64,
    seller_id: i64,
    quantity: i32,
    total_price: i64,
    order_type: String,
    created_at: i64,
    updated_at: i64,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            order_id: row.order_id,
            customer_id: row.customer_id,
            menu_id: row.menu_id,
            seller_id: row.seller_id,
            quantity: row.quantity,
            total_price: row.total_price,
            order_type: OrderState::from_db(&row.order_type),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Stock reservation and order insert in one read-committed transaction
pub async fn place(
    pool: &PgPool,
    order: &NewOrder,
    change: &StockChange,
    now: i64,
) -> RepoResult<Order> {
    if order.quantity < 1 {
        return Err(RepoError::Validation(format!(
            "order quantity must be at least 1, got {}",
            order.quantity
        )));
    }

    let mut tx = begin_read_committed(pool).await?;

    ledger::apply_reservation(&mut *tx, change, now).await?;

    let row: OrderRow = sqlx::query_as(
        "INSERT INTO orders (
            customer_id, menu_id, seller_id, quantity, total_price,
            order_type, created_at, updated_at
         )
         VALUES ($1, $2, $3, $4, $5, 'PENDING', $6, $6)
         RETURNING *",
    )
    .bind(order.customer_id)
    .bind(order.menu_id)
    .bind(order.seller_id)
    .bind(order.quantity)
    .bind(order.total_price)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(row.into())
}

pub async fn list_by_customer(pool: &PgPool, customer_id: i64) -> RepoResult<Vec<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(
        "SELECT * FROM orders WHERE customer_id = $1
         ORDER BY created_at DESC, order_id DESC",
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Order::from).collect())
}

pub async fn list_pending_by_seller(pool: &PgPool, seller_id: i64) -> RepoResult<Vec<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(
        "SELECT * FROM orders WHERE seller_id = $1 AND order_type = 'PENDING'
         ORDER BY created_at DESC, order_id DESC",
    )
    .bind(seller_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Order::from).collect())
}

/// Guarded `PENDING -> outcome` transition; cancel restocks in the same transaction
pub async fn resolve(
    pool: &PgPool,
    order_id: i64,
    outcome: OrderOutcome,
    now: i64,
) -> RepoResult<Order> {
    let mut tx = begin_read_committed(pool).await?;

    let row: Option<OrderRow> = sqlx::query_as(
        "UPDATE orders SET order_type = $1, updated_at = $2
         WHERE order_id = $3 AND order_type = 'PENDING'
         RETURNING *",
    )
    .bind(outcome.target_state().as_str())
    .bind(now)
    .bind(order_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
        let current: Option<(String,)> =
            sqlx::query_as("SELECT order_type FROM orders WHERE order_id = $1")
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?;
        return Err(match current {
            None => RepoError::NotFound(format!("Order {order_id}")),
            Some((state,)) => RepoError::Conflict(format!("order {order_id} is already {state}")),
        });
    };

    if outcome == OrderOutcome::Cancel {
        let change = ledger::release(&mut *tx, row.menu_id, row.quantity, now).await?;
        tracing::debug!(
            order_id,
            menu_id = row.menu_id,
            restocked = change.quantity,
            "Stock released"
        );
    }

    tx.commit().await?;
    Ok(row.into())
}
