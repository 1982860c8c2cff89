//! Inventory ledger
//!
//! Stock math for a menu item. Every stock mutation (order placement,
//! cancellation restock) computes its target through [`reserve`] or
//! [`release`]; the stores only persist the resulting [`StockChange`].

use shared::error::{AppError, ErrorCode};
use shared::models::{Menu, MenuStatus};
use thiserror::Error;

/// Target stock and status for one menu, plus the stock it was computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockChange {
    pub menu_id: i64,
    /// Stock the change was computed from
    pub previous: i32,
    /// Stock after the change
    pub quantity: i32,
    pub status: MenuStatus,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Only {remaining} left of {menu_name}")]
    InsufficientStock { menu_name: String, remaining: i32 },

    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(i32),

    #[error("Stock of menu {0} would overflow")]
    StockOverflow(i64),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientStock {
                menu_name,
                remaining,
            } => AppError::insufficient_stock(&menu_name, remaining),
            LedgerError::InvalidQuantity(_) => AppError::new(ErrorCode::InvalidQuantity),
            LedgerError::StockOverflow(_) => {
                AppError::with_message(ErrorCode::InvalidRequest, err.to_string())
            }
        }
    }
}

/// Deduct `quantity` from the menu's stock.
///
/// The resulting status is `SOLD_OUT` exactly when the stock reaches zero.
pub fn reserve(menu: &Menu, quantity: i32) -> Result<StockChange, LedgerError> {
    if quantity < 1 {
        return Err(LedgerError::InvalidQuantity(quantity));
    }
    let remaining = menu.quantity - quantity;
    if remaining < 0 {
        return Err(LedgerError::InsufficientStock {
            menu_name: menu.name.clone(),
            remaining: menu.quantity,
        });
    }
    Ok(StockChange {
        menu_id: menu.menu_id,
        previous: menu.quantity,
        quantity: remaining,
        status: MenuStatus::for_stock(remaining),
    })
}

/// Add `quantity` back to the menu's stock.
///
/// A restocked menu is always `FOR_SALE`, even if the owner had marked it
/// sold out by hand.
pub fn release(menu: &Menu, quantity: i32) -> Result<StockChange, LedgerError> {
    if quantity < 1 {
        return Err(LedgerError::InvalidQuantity(quantity));
    }
    let restocked = menu
        .quantity
        .checked_add(quantity)
        .ok_or(LedgerError::StockOverflow(menu.menu_id))?;
    Ok(StockChange {
        menu_id: menu.menu_id,
        previous: menu.quantity,
        quantity: restocked,
        status: MenuStatus::ForSale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kimchi_stew(stock: i32, status: MenuStatus) -> Menu {
        Menu {
            menu_id: 1,
            user_id: 10,
            category_id: 100,
            name: "Kimchi Stew".into(),
            description: String::new(),
            image: None,
            price: 8000,
            quantity: stock,
            status,
            order: 1,
            author: "boss".into(),
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
        }
    }

    #[test]
    fn reserve_deducts_and_keeps_for_sale() {
        let change = reserve(&kimchi_stew(5, MenuStatus::ForSale), 3).unwrap();
        assert_eq!(change.previous, 5);
        assert_eq!(change.quantity, 2);
        assert_eq!(change.status, MenuStatus::ForSale);
    }

    #[test]
    fn reserve_to_zero_sells_out() {
        let change = reserve(&kimchi_stew(2, MenuStatus::ForSale), 2).unwrap();
        assert_eq!(change.quantity, 0);
        assert_eq!(change.status, MenuStatus::SoldOut);
    }

    #[test]
    fn reserve_more_than_stock_reports_name_and_remaining() {
        let err = reserve(&kimchi_stew(2, MenuStatus::ForSale), 5).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientStock {
                menu_name: "Kimchi Stew".into(),
                remaining: 2
            }
        );
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::InsufficientStock);
        assert!(app.message.contains("Kimchi Stew"));
        assert!(app.message.contains('2'));
    }

    #[test]
    fn reserve_rejects_non_positive_quantity() {
        let menu = kimchi_stew(5, MenuStatus::ForSale);
        assert_eq!(reserve(&menu, 0), Err(LedgerError::InvalidQuantity(0)));
        assert_eq!(reserve(&menu, -3), Err(LedgerError::InvalidQuantity(-3)));
    }

    #[test]
    fn release_restocks_and_forces_for_sale() {
        let change = release(&kimchi_stew(0, MenuStatus::SoldOut), 2).unwrap();
        assert_eq!(change.quantity, 2);
        assert_eq!(change.status, MenuStatus::ForSale);

        // manual sold-out with stock left is overridden as well
        let change = release(&kimchi_stew(4, MenuStatus::SoldOut), 1).unwrap();
        assert_eq!(change.quantity, 5);
        assert_eq!(change.status, MenuStatus::ForSale);
    }

    #[test]
    fn release_overflow_is_rejected() {
        let menu = kimchi_stew(i32::MAX, MenuStatus::ForSale);
        assert_eq!(release(&menu, 1), Err(LedgerError::StockOverflow(1)));
    }
}
