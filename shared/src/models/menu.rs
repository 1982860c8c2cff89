//! Menu Model

use serde::{Deserialize, Serialize};

pub const MENU_MIN_PRICE: i64 = 1;
pub const MENU_MAX_PRICE: i64 = 1_000_000;

/// Sale status of a menu item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MenuStatus {
    ForSale,
    SoldOut,
}

impl MenuStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForSale => "FOR_SALE",
            Self::SoldOut => "SOLD_OUT",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "SOLD_OUT" => Self::SoldOut,
            _ => Self::ForSale,
        }
    }

    /// Status implied by a stock level: sold out exactly at zero
    pub fn for_stock(quantity: i32) -> Self {
        if quantity == 0 {
            Self::SoldOut
        } else {
            Self::ForSale
        }
    }
}

/// Menu entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub menu_id: i64,
    /// Seller who owns this menu; never changes after creation
    pub user_id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    /// Unit price in won
    pub price: i64,
    /// Stock on hand, never negative
    pub quantity: i32,
    pub status: MenuStatus,
    pub order: i32,
    pub author: String,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip)]
    pub deleted_at: Option<i64>,
}

impl Menu {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Create menu payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub image: Option<String>,
    pub price: i64,
    /// Initial stock
    #[serde(default)]
    pub quantity: i32,
}

/// Update menu payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<i64>,
    pub order: Option<i32>,
    pub status: Option<MenuStatus>,
    /// Restock; status is re-derived from the new stock
    pub quantity: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_stock() {
        assert_eq!(MenuStatus::for_stock(0), MenuStatus::SoldOut);
        assert_eq!(MenuStatus::for_stock(1), MenuStatus::ForSale);
        assert_eq!(MenuStatus::for_stock(250), MenuStatus::ForSale);
    }

    #[test]
    fn status_wire_format() {
        assert_eq!(
            serde_json::to_string(&MenuStatus::SoldOut).unwrap(),
            "\"SOLD_OUT\""
        );
        assert_eq!(MenuStatus::from_db("FOR_SALE"), MenuStatus::ForSale);
        assert_eq!(MenuStatus::from_db("SOLD_OUT"), MenuStatus::SoldOut);
    }

    #[test]
    fn menu_serializes_without_deleted_marker() {
        let menu = Menu {
            menu_id: 1,
            user_id: 2,
            category_id: 3,
            name: "Kimchi Stew".into(),
            description: String::new(),
            image: None,
            price: 8000,
            quantity: 5,
            status: MenuStatus::ForSale,
            order: 1,
            author: "boss".into(),
            created_at: 0,
            updated_at: 0,
            deleted_at: Some(10),
        };
        let json = serde_json::to_value(&menu).unwrap();
        assert_eq!(json["menuId"], 1);
        assert_eq!(json["status"], "FOR_SALE");
        assert!(json.get("deletedAt").is_none());
    }
}
