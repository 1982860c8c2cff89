//! Storage layer
//!
//! Handlers and the order workflow only see the traits below. Two backends
//! implement them: [`pg::PgStore`] (PostgreSQL, production) and
//! [`memory::MemoryStore`] (development and tests).

pub mod memory;
pub mod pg;

use async_trait::async_trait;
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, Menu, MenuCreate, MenuStatus, MenuUpdate, NewOrder,
    Order, OrderOutcome, User, UserRole,
};
use thiserror::Error;

use crate::inventory::StockChange;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Row changed between read and guarded write
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepoError::NotFound("row".into()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            other => RepoError::Database(other.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// A user row together with its password hash
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with `Duplicate` when the nickname is taken
    async fn create_user(
        &self,
        nickname: &str,
        password_hash: &str,
        role: UserRole,
    ) -> RepoResult<User>;
    async fn find_credentials(&self, nickname: &str) -> RepoResult<Option<UserCredentials>>;
    async fn find_user(&self, user_id: i64) -> RepoResult<Option<User>>;
    async fn delete_user(&self, user_id: i64) -> RepoResult<()>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Appends the category after the current last display slot
    async fn create_category(&self, owner: &User, data: &CategoryCreate) -> RepoResult<Category>;
    /// Live categories by display order
    async fn list_categories(&self) -> RepoResult<Vec<Category>>;
    async fn find_category(&self, category_id: i64) -> RepoResult<Option<Category>>;
    async fn update_category(
        &self,
        category_id: i64,
        data: &CategoryUpdate,
    ) -> RepoResult<Category>;
    /// Soft-deletes the category and every menu in it
    async fn delete_category(&self, category_id: i64) -> RepoResult<()>;

    async fn create_menu(
        &self,
        owner: &User,
        category_id: i64,
        data: &MenuCreate,
    ) -> RepoResult<Menu>;
    async fn list_menus(&self, category_id: i64) -> RepoResult<Vec<Menu>>;
    /// Live (not soft-deleted) menu by id
    async fn find_menu(&self, menu_id: i64) -> RepoResult<Option<Menu>>;
    async fn update_menu(&self, menu_id: i64, data: &MenuUpdate) -> RepoResult<Menu>;
    async fn delete_menu(&self, menu_id: i64) -> RepoResult<()>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Applies a reservation to the menu and inserts the order in one unit.
    ///
    /// The stock write only lands if the menu still holds
    /// `change.previous`; otherwise nothing is written and `Conflict` is
    /// returned. A missing or soft-deleted menu yields `NotFound`.
    async fn place_order(&self, order: NewOrder, change: StockChange) -> RepoResult<Order>;

    /// Customer's orders, newest first
    async fn list_customer_orders(&self, customer_id: i64) -> RepoResult<Vec<Order>>;

    /// Seller's `PENDING` orders, newest first
    async fn list_seller_pending(&self, seller_id: i64) -> RepoResult<Vec<Order>>;

    /// Moves a `PENDING` order to its terminal state. `CANCEL` releases the
    /// order's quantity back to the menu in the same unit.
    ///
    /// Fails with `Conflict` when the order is no longer `PENDING`.
    async fn resolve_order(&self, order_id: i64, outcome: OrderOutcome) -> RepoResult<Order>;
}

/// Apply a menu patch.
///
/// Changing the stock re-derives the sale status; an explicit status wins
/// over that, except that a menu with zero stock is always `SOLD_OUT`.
pub(crate) fn apply_menu_update(menu: &mut Menu, data: &MenuUpdate) {
    if let Some(name) = &data.name {
        menu.name = name.clone();
    }
    if let Some(description) = &data.description {
        menu.description = description.clone();
    }
    if let Some(image) = &data.image {
        menu.image = Some(image.clone());
    }
    if let Some(price) = data.price {
        menu.price = price;
    }
    if let Some(order) = data.order {
        menu.order = order;
    }
    if let Some(quantity) = data.quantity {
        menu.quantity = quantity;
        menu.status = MenuStatus::for_stock(quantity);
    }
    if let Some(status) = data.status {
        menu.status = status;
    }
    if menu.quantity == 0 {
        menu.status = MenuStatus::SoldOut;
    }
}

/// Everything the HTTP layer needs from persistence
pub trait Store: AccountStore + CatalogStore + OrderStore {}

impl<T: AccountStore + CatalogStore + OrderStore> Store for T {}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(quantity: i32, status: MenuStatus) -> Menu {
        Menu {
            menu_id: 1,
            user_id: 1,
            category_id: 1,
            name: "Bibimbap".into(),
            description: String::new(),
            image: None,
            price: 9000,
            quantity,
            status,
            order: 1,
            author: "boss".into(),
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
        }
    }

    #[test]
    fn manual_sold_out_sticks_without_stock_change() {
        let mut m = menu(3, MenuStatus::ForSale);
        apply_menu_update(
            &mut m,
            &MenuUpdate {
                status: Some(MenuStatus::SoldOut),
                ..Default::default()
            },
        );
        assert_eq!(m.status, MenuStatus::SoldOut);
        assert_eq!(m.quantity, 3);
    }

    #[test]
    fn empty_stock_cannot_be_put_back_on_sale() {
        let mut m = menu(0, MenuStatus::SoldOut);
        apply_menu_update(
            &mut m,
            &MenuUpdate {
                status: Some(MenuStatus::ForSale),
                ..Default::default()
            },
        );
        assert_eq!(m.status, MenuStatus::SoldOut);

        let mut m = menu(5, MenuStatus::ForSale);
        apply_menu_update(
            &mut m,
            &MenuUpdate {
                quantity: Some(0),
                status: Some(MenuStatus::ForSale),
                ..Default::default()
            },
        );
        assert_eq!(m.quantity, 0);
        assert_eq!(m.status, MenuStatus::SoldOut);
    }

    #[test]
    fn manual_sold_out_survives_restock_in_same_patch() {
        let mut m = menu(0, MenuStatus::SoldOut);
        apply_menu_update(
            &mut m,
            &MenuUpdate {
                quantity: Some(6),
                status: Some(MenuStatus::SoldOut),
                ..Default::default()
            },
        );
        assert_eq!(m.quantity, 6);
        assert_eq!(m.status, MenuStatus::SoldOut);
    }

    #[test]
    fn stock_change_rederives_status() {
        let mut m = menu(0, MenuStatus::SoldOut);
        apply_menu_update(
            &mut m,
            &MenuUpdate {
                quantity: Some(4),
                price: Some(9500),
                ..Default::default()
            },
        );
        assert_eq!(m.status, MenuStatus::ForSale);
        assert_eq!(m.price, 9500);
    }
}
