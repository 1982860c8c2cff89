//! Seller pending queue
//!
//! Sellers address pending orders by 1-based position in their current
//! newest-first pending list. Positions are relative to the list at the time
//! of the call, so the list carries a snapshot id: a client that echoes it
//! back gets a `PendingQueueChanged` rejection instead of silently resolving
//! a different order when the queue moved underneath it.

use sha2::{Digest, Sha256};
use shared::error::{AppError, ErrorCode};
use shared::models::Order;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("There are no pending orders")]
    Empty,

    #[error("No pending order at position {position} (queue holds {len})")]
    OutOfRange { position: usize, len: usize },

    #[error("Pending orders changed since snapshot {expected}")]
    SnapshotMismatch { expected: String },
}

impl From<QueueError> for AppError {
    fn from(err: QueueError) -> Self {
        match &err {
            QueueError::Empty => AppError::new(ErrorCode::NoPendingOrders),
            QueueError::OutOfRange { position, len } => {
                AppError::with_message(ErrorCode::PositionOutOfRange, err.to_string())
                    .with_detail("position", *position)
                    .with_detail("pending", *len)
            }
            QueueError::SnapshotMismatch { .. } => AppError::new(ErrorCode::PendingQueueChanged),
        }
    }
}

/// A seller's pending orders as fetched at one point in time
#[derive(Debug, Clone)]
pub struct PendingQueue {
    orders: Vec<Order>,
    snapshot: String,
}

impl PendingQueue {
    /// `orders` must already be newest-first
    pub fn new(orders: Vec<Order>) -> Self {
        let snapshot = snapshot_id(&orders);
        Self { orders, snapshot }
    }

    pub fn snapshot(&self) -> &str {
        &self.snapshot
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Order>, String) {
        (self.orders, self.snapshot)
    }

    /// Order at 1-based `position`, optionally pinned to a snapshot id
    pub fn at_position(
        &self,
        position: usize,
        expected: Option<&str>,
    ) -> Result<&Order, QueueError> {
        if self.orders.is_empty() {
            return Err(QueueError::Empty);
        }
        match expected {
            Some(expected) if expected != self.snapshot => {
                return Err(QueueError::SnapshotMismatch {
                    expected: expected.to_string(),
                });
            }
            _ => {}
        }
        position
            .checked_sub(1)
            .and_then(|idx| self.orders.get(idx))
            .ok_or(QueueError::OutOfRange {
                position,
                len: self.orders.len(),
            })
    }
}

/// Hex SHA-256 over the ordered pending ids
fn snapshot_id(orders: &[Order]) -> String {
    let mut hasher = Sha256::new();
    for order in orders {
        hasher.update(order.order_id.to_be_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderState;

    fn pending(order_id: i64) -> Order {
        Order {
            order_id,
            customer_id: 1,
            menu_id: 1,
            seller_id: 2,
            quantity: 1,
            total_price: 8000,
            order_type: OrderState::Pending,
            created_at: order_id,
            updated_at: order_id,
        }
    }

    #[test]
    fn position_is_one_based() {
        let queue = PendingQueue::new(vec![pending(3), pending(2), pending(1)]);
        assert_eq!(queue.at_position(1, None).unwrap().order_id, 3);
        assert_eq!(queue.at_position(3, None).unwrap().order_id, 1);
    }

    #[test]
    fn zero_and_past_end_are_out_of_range() {
        let queue = PendingQueue::new(vec![pending(2), pending(1)]);
        assert_eq!(
            queue.at_position(0, None),
            Err(QueueError::OutOfRange { position: 0, len: 2 })
        );
        assert_eq!(
            queue.at_position(3, None),
            Err(QueueError::OutOfRange { position: 3, len: 2 })
        );
    }

    #[test]
    fn empty_queue_reports_no_pending_orders() {
        let queue = PendingQueue::new(Vec::new());
        assert!(queue.is_empty());
        assert_eq!(queue.at_position(1, None), Err(QueueError::Empty));
        let err: AppError = QueueError::Empty.into();
        assert_eq!(err.code, ErrorCode::NoPendingOrders);
    }

    #[test]
    fn snapshot_tracks_queue_contents() {
        let before = PendingQueue::new(vec![pending(2), pending(1)]);
        let same = PendingQueue::new(vec![pending(2), pending(1)]);
        let after = PendingQueue::new(vec![pending(1)]);

        assert_eq!(before.snapshot(), same.snapshot());
        assert_ne!(before.snapshot(), after.snapshot());
        assert_eq!(before.snapshot().len(), 64);
    }

    #[test]
    fn stale_snapshot_is_rejected() {
        let seen = PendingQueue::new(vec![pending(2), pending(1)]);
        let current = PendingQueue::new(vec![pending(1)]);

        assert_eq!(
            current.at_position(1, Some(seen.snapshot())),
            Err(QueueError::SnapshotMismatch {
                expected: seen.snapshot().to_string()
            })
        );
        assert_eq!(
            current
                .at_position(1, Some(current.snapshot()))
                .unwrap()
                .order_id,
            1
        );
    }
}
