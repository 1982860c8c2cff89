//! PostgreSQL store
//!
//! Free async functions per table, aggregated behind the store traits.

pub mod categories;
pub mod ledger;
pub mod menus;
pub mod orders;
pub mod users;

use async_trait::async_trait;
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, Menu, MenuCreate, MenuUpdate, NewOrder, Order,
    OrderOutcome, User, UserRole,
};
use sqlx::{PgPool, Postgres, Transaction};

use super::{AccountStore, CatalogStore, OrderStore, RepoResult, UserCredentials};
use crate::inventory::StockChange;
use crate::util::now_millis;

/// Open a transaction pinned to READ COMMITTED
pub(crate) async fn begin_read_committed(
    pool: &PgPool,
) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL READ COMMITTED")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn create_user(
        &self,
        nickname: &str,
        password_hash: &str,
        role: UserRole,
    ) -> RepoResult<User> {
        users::create(&self.pool, nickname, password_hash, role, now_millis()).await
    }

    async fn find_credentials(&self, nickname: &str) -> RepoResult<Option<UserCredentials>> {
        users::find_by_nickname(&self.pool, nickname).await
    }

    async fn find_user(&self, user_id: i64) -> RepoResult<Option<User>> {
        users::find_by_id(&self.pool, user_id).await
    }

    async fn delete_user(&self, user_id: i64) -> RepoResult<()> {
        users::delete(&self.pool, user_id).await
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn create_category(&self, owner: &User, data: &CategoryCreate) -> RepoResult<Category> {
        categories::create(&self.pool, owner, data, now_millis()).await
    }

    async fn list_categories(&self) -> RepoResult<Vec<Category>> {
        categories::list(&self.pool).await
    }

    async fn find_category(&self, category_id: i64) -> RepoResult<Option<Category>> {
        categories::find(&self.pool, category_id).await
    }

    async fn update_category(
        &self,
        category_id: i64,
        data: &CategoryUpdate,
    ) -> RepoResult<Category> {
        categories::update(&self.pool, category_id, data, now_millis()).await
    }

    async fn delete_category(&self, category_id: i64) -> RepoResult<()> {
        categories::delete(&self.pool, category_id, now_millis()).await
    }

    async fn create_menu(
        &self,
        owner: &User,
        category_id: i64,
        data: &MenuCreate,
    ) -> RepoResult<Menu> {
        menus::create(&self.pool, owner, category_id, data, now_millis()).await
    }

    async fn list_menus(&self, category_id: i64) -> RepoResult<Vec<Menu>> {
        menus::list_by_category(&self.pool, category_id).await
    }

    async fn find_menu(&self, menu_id: i64) -> RepoResult<Option<Menu>> {
        menus::find(&self.pool, menu_id).await
    }

    async fn update_menu(&self, menu_id: i64, data: &MenuUpdate) -> RepoResult<Menu> {
        menus::update(&self.pool, menu_id, data, now_millis()).await
    }

    async fn delete_menu(&self, menu_id: i64) -> RepoResult<()> {
        menus::delete(&self.pool, menu_id, now_millis()).await
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn place_order(&self, order: NewOrder, change: StockChange) -> RepoResult<Order> {
        orders::place(&self.pool, &order, &change, now_millis()).await
    }

    async fn list_customer_orders(&self, customer_id: i64) -> RepoResult<Vec<Order>> {
        orders::list_by_customer(&self.pool, customer_id).await
    }

    async fn list_seller_pending(&self, seller_id: i64) -> RepoResult<Vec<Order>> {
        orders::list_pending_by_seller(&self.pool, seller_id).await
    }

    async fn resolve_order(&self, order_id: i64, outcome: OrderOutcome) -> RepoResult<Order> {
        orders::resolve(&self.pool, order_id, outcome, now_millis()).await
    }
}
