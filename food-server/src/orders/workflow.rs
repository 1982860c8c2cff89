//! Order workflow
//!
//! Places orders against menu inventory and lets sellers accept or cancel
//! pending orders by queue position. All stock math goes through
//! [`crate::inventory`]; atomicity comes from the store.

use shared::error::{AppError, ErrorCode};
use shared::models::{CreateOrderRequest, NewOrder, Order, OrderOutcome, UserRole};

use crate::auth::{CurrentUser, require_role};
use crate::db::{RepoError, Store};
use crate::error::ServiceResult;
use crate::inventory;
use crate::orders::PendingQueue;

pub struct OrderWorkflow<'a> {
    store: &'a dyn Store,
}

impl<'a> OrderWorkflow<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Reserve stock for `req.quantity` of a menu and record a `PENDING` order.
    pub async fn place_order(
        &self,
        caller: &CurrentUser,
        req: &CreateOrderRequest,
    ) -> ServiceResult<Order> {
        require_role(caller, UserRole::Customer)?;

        if req.quantity < 1 {
            return Err(AppError::new(ErrorCode::InvalidQuantity).into());
        }

        let menu = self.store.find_menu(req.menu_id).await?.ok_or_else(|| {
            AppError::with_message(
                ErrorCode::OrderMenuUnavailable,
                format!("Menu {} does not exist", req.menu_id),
            )
        })?;

        let change = inventory::reserve(&menu, req.quantity).map_err(AppError::from)?;

        let total_price = menu
            .price
            .checked_mul(i64::from(req.quantity))
            .ok_or_else(|| AppError::invalid_request("Order total is too large"))?;

        let new_order = NewOrder {
            customer_id: caller.id,
            menu_id: menu.menu_id,
            seller_id: menu.user_id,
            quantity: req.quantity,
            total_price,
        };

        let order = match self.store.place_order(new_order, change).await {
            Ok(order) => order,
            Err(RepoError::Conflict(_)) => {
                tracing::info!(menu_id = menu.menu_id, "Stock changed during order placement");
                return Err(AppError::new(ErrorCode::StockChanged).into());
            }
            Err(RepoError::NotFound(_)) => {
                return Err(AppError::new(ErrorCode::OrderMenuUnavailable).into());
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            order_id = order.order_id,
            menu_id = order.menu_id,
            customer_id = order.customer_id,
            quantity = order.quantity,
            remaining = change.quantity,
            "Order placed"
        );
        Ok(order)
    }

    /// Caller's own orders, newest first. Empty is a normal result.
    pub async fn list_customer_orders(&self, caller: &CurrentUser) -> ServiceResult<Vec<Order>> {
        Ok(self.store.list_customer_orders(caller.id).await?)
    }

    /// Seller's pending queue as of now; may be empty.
    pub async fn pending_queue(&self, caller: &CurrentUser) -> ServiceResult<PendingQueue> {
        require_role(caller, UserRole::Owner)?;
        let orders = self.store.list_seller_pending(caller.id).await?;
        Ok(PendingQueue::new(orders))
    }

    /// Seller's pending queue, reporting an empty queue as `NoPendingOrders`.
    pub async fn list_seller_pending(&self, caller: &CurrentUser) -> ServiceResult<PendingQueue> {
        let queue = self.pending_queue(caller).await?;
        if queue.is_empty() {
            return Err(AppError::new(ErrorCode::NoPendingOrders).into());
        }
        Ok(queue)
    }

    /// Accept or cancel the order at 1-based `position` of a freshly fetched
    /// pending queue. With `snapshot`, the queue must still match what the
    /// client listed.
    pub async fn resolve_order(
        &self,
        caller: &CurrentUser,
        position: usize,
        outcome: OrderOutcome,
        snapshot: Option<&str>,
    ) -> ServiceResult<Order> {
        let queue = self.pending_queue(caller).await?;
        let target = queue
            .at_position(position, snapshot)
            .map_err(AppError::from)?;
        let order_id = target.order_id;

        let order = match self.store.resolve_order(order_id, outcome).await {
            Ok(order) => order,
            Err(RepoError::Conflict(_)) => {
                return Err(AppError::with_message(
                    ErrorCode::OrderAlreadyResolved,
                    format!("Order {order_id} is no longer pending"),
                )
                .into());
            }
            Err(RepoError::NotFound(_)) => {
                return Err(AppError::with_message(
                    ErrorCode::OrderNotFound,
                    format!("Order {order_id} not found"),
                )
                .into());
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            order_id,
            seller_id = caller.id,
            position,
            outcome = ?outcome,
            "Order resolved"
        );
        Ok(order)
    }
}
