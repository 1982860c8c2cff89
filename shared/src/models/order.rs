//! Order Model

use serde::{Deserialize, Serialize};

/// Order lifecycle: `PENDING` moves once to `ACCEPT` or `CANCEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    Pending,
    Accept,
    Cancel,
}

impl OrderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accept => "ACCEPT",
            Self::Cancel => "CANCEL",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "ACCEPT" => Self::Accept,
            "CANCEL" => Self::Cancel,
            _ => Self::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// What a seller decides for a pending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderOutcome {
    Accept,
    Cancel,
}

impl OrderOutcome {
    /// Terminal state the order moves to
    pub fn target_state(&self) -> OrderState {
        match self {
            Self::Accept => OrderState::Accept,
            Self::Cancel => OrderState::Cancel,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Accept => "Order accepted",
            Self::Cancel => "Order cancelled",
        }
    }
}

/// Order entity
///
/// `seller_id` is copied from the menu at creation and `total_price` is
/// frozen at `price * quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: i64,
    pub customer_id: i64,
    pub menu_id: i64,
    pub seller_id: i64,
    pub quantity: i32,
    #[serde(rename = "totalprice")]
    pub total_price: i64,
    pub order_type: OrderState,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields for a new order row; the store assigns id and timestamps
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: i64,
    pub menu_id: i64,
    pub seller_id: i64,
    pub quantity: i32,
    pub total_price: i64,
}

/// Place order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub menu_id: i64,
    pub quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_wire_shape() {
        let order = Order {
            order_id: 9,
            customer_id: 1,
            menu_id: 2,
            seller_id: 3,
            quantity: 3,
            total_price: 24000,
            order_type: OrderState::Pending,
            created_at: 1_700_000_000_000,
            updated_at: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["orderId"], 9);
        assert_eq!(json["sellerId"], 3);
        assert_eq!(json["totalprice"], 24000);
        assert_eq!(json["orderType"], "PENDING");
    }

    #[test]
    fn outcome_maps_to_terminal_state() {
        assert_eq!(OrderOutcome::Accept.target_state(), OrderState::Accept);
        assert_eq!(OrderOutcome::Cancel.target_state(), OrderState::Cancel);
        assert!(OrderOutcome::Cancel.target_state().is_terminal());
        assert!(!OrderState::Pending.is_terminal());
    }

    #[test]
    fn create_request_uses_menu_id_key() {
        let req: CreateOrderRequest =
            serde_json::from_str(r#"{"menuId":4,"quantity":2}"#).unwrap();
        assert_eq!(req.menu_id, 4);
        assert_eq!(req.quantity, 2);
    }
}
