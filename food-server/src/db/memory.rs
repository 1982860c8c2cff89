//! In-memory store
//!
//! Single mutex over all tables, so every trait call is atomic. Used when no
//! database is configured in development and by the test suites.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, Menu, MenuCreate, MenuStatus, MenuUpdate, NewOrder,
    Order, OrderOutcome, OrderState, User, UserRole,
};

use super::{
    AccountStore, CatalogStore, OrderStore, RepoError, RepoResult, UserCredentials,
    apply_menu_update,
};
use crate::inventory::{self, StockChange};
use crate::util::now_millis;

#[derive(Default)]
struct Tables {
    last_user_id: i64,
    last_category_id: i64,
    last_menu_id: i64,
    last_order_id: i64,
    users: BTreeMap<i64, UserCredentials>,
    categories: BTreeMap<i64, Category>,
    menus: BTreeMap<i64, Menu>,
    orders: BTreeMap<i64, Order>,
}

impl Tables {
    fn live_category_mut(&mut self, category_id: i64) -> RepoResult<&mut Category> {
        self.categories
            .get_mut(&category_id)
            .filter(|c| c.deleted_at.is_none())
            .ok_or_else(|| RepoError::NotFound(format!("Category {category_id}")))
    }

    fn live_menu_mut(&mut self, menu_id: i64) -> RepoResult<&mut Menu> {
        self.menus
            .get_mut(&menu_id)
            .filter(|m| !m.is_deleted())
            .ok_or_else(|| RepoError::NotFound(format!("Menu {menu_id}")))
    }

    fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.order_id.cmp(&a.order_id))
        });
        orders
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_user(
        &self,
        nickname: &str,
        password_hash: &str,
        role: UserRole,
    ) -> RepoResult<User> {
        let mut t = self.tables.lock();
        if t.users.values().any(|c| c.user.nickname == nickname) {
            return Err(RepoError::Duplicate(format!("nickname {nickname}")));
        }
        t.last_user_id += 1;
        let now = now_millis();
        let user = User {
            user_id: t.last_user_id,
            nickname: nickname.to_string(),
            user_type: role,
            created_at: now,
            updated_at: now,
        };
        t.users.insert(
            user.user_id,
            UserCredentials {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(user)
    }

    async fn find_credentials(&self, nickname: &str) -> RepoResult<Option<UserCredentials>> {
        let t = self.tables.lock();
        Ok(t.users
            .values()
            .find(|c| c.user.nickname == nickname)
            .cloned())
    }

    async fn find_user(&self, user_id: i64) -> RepoResult<Option<User>> {
        Ok(self.tables.lock().users.get(&user_id).map(|c| c.user.clone()))
    }

    async fn delete_user(&self, user_id: i64) -> RepoResult<()> {
        self.tables
            .lock()
            .users
            .remove(&user_id)
            .map(|_| ())
            .ok_or_else(|| RepoError::NotFound(format!("User {user_id}")))
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn create_category(&self, owner: &User, data: &CategoryCreate) -> RepoResult<Category> {
        let mut t = self.tables.lock();
        let order = t.categories.values().map(|c| c.order).max().unwrap_or(0) + 1;
        t.last_category_id += 1;
        let now = now_millis();
        let category = Category {
            category_id: t.last_category_id,
            user_id: owner.user_id,
            name: data.name.clone(),
            order,
            author: owner.nickname.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        t.categories.insert(category.category_id, category.clone());
        Ok(category)
    }

    async fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let t = self.tables.lock();
        let mut list: Vec<Category> = t
            .categories
            .values()
            .filter(|c| c.deleted_at.is_none())
            .cloned()
            .collect();
        list.sort_by_key(|c| (c.order, c.category_id));
        Ok(list)
    }

    async fn find_category(&self, category_id: i64) -> RepoResult<Option<Category>> {
        let t = self.tables.lock();
        Ok(t.categories
            .get(&category_id)
            .filter(|c| c.deleted_at.is_none())
            .cloned())
    }

    async fn update_category(
        &self,
        category_id: i64,
        data: &CategoryUpdate,
    ) -> RepoResult<Category> {
        let mut t = self.tables.lock();
        t.live_category_mut(category_id)?;
        let now = now_millis();

        if let Some(target) = data.order {
            let taken = t
                .categories
                .values()
                .any(|c| c.category_id != category_id && c.order == target);
            if taken {
                for c in t.categories.values_mut().filter(|c| c.order >= target) {
                    c.order += 1;
                    c.updated_at = now;
                }
            }
        }

        let category = t.live_category_mut(category_id)?;
        if let Some(name) = &data.name {
            category.name = name.clone();
        }
        if let Some(order) = data.order {
            category.order = order;
        }
        category.updated_at = now;
        Ok(category.clone())
    }

    async fn delete_category(&self, category_id: i64) -> RepoResult<()> {
        let mut t = self.tables.lock();
        let now = now_millis();
        t.live_category_mut(category_id)?.deleted_at = Some(now);
        for menu in t
            .menus
            .values_mut()
            .filter(|m| m.category_id == category_id && !m.is_deleted())
        {
            menu.deleted_at = Some(now);
        }
        Ok(())
    }

    async fn create_menu(
        &self,
        owner: &User,
        category_id: i64,
        data: &MenuCreate,
    ) -> RepoResult<Menu> {
        let mut t = self.tables.lock();
        t.live_category_mut(category_id)?;
        let order = t.menus.values().map(|m| m.order).max().unwrap_or(0) + 1;
        t.last_menu_id += 1;
        let now = now_millis();
        let menu = Menu {
            menu_id: t.last_menu_id,
            user_id: owner.user_id,
            category_id,
            name: data.name.clone(),
            description: data.description.clone(),
            image: data.image.clone(),
            price: data.price,
            quantity: data.quantity,
            status: MenuStatus::for_stock(data.quantity),
            order,
            author: owner.nickname.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        t.menus.insert(menu.menu_id, menu.clone());
        Ok(menu)
    }

    async fn list_menus(&self, category_id: i64) -> RepoResult<Vec<Menu>> {
        let t = self.tables.lock();
        let mut list: Vec<Menu> = t
            .menus
            .values()
            .filter(|m| m.category_id == category_id && !m.is_deleted())
            .cloned()
            .collect();
        list.sort_by_key(|m| (m.order, m.menu_id));
        Ok(list)
    }

    async fn find_menu(&self, menu_id: i64) -> RepoResult<Option<Menu>> {
        let t = self.tables.lock();
        Ok(t.menus.get(&menu_id).filter(|m| !m.is_deleted()).cloned())
    }

    async fn update_menu(&self, menu_id: i64, data: &MenuUpdate) -> RepoResult<Menu> {
        let mut t = self.tables.lock();
        t.live_menu_mut(menu_id)?;
        let now = now_millis();

        if let Some(target) = data.order {
            let taken = t
                .menus
                .values()
                .any(|m| m.menu_id != menu_id && m.order == target);
            if taken {
                for m in t.menus.values_mut().filter(|m| m.order >= target) {
                    m.order += 1;
                    m.updated_at = now;
                }
            }
        }

        let menu = t.live_menu_mut(menu_id)?;
        apply_menu_update(menu, data);
        menu.updated_at = now;
        Ok(menu.clone())
    }

    async fn delete_menu(&self, menu_id: i64) -> RepoResult<()> {
        let mut t = self.tables.lock();
        t.live_menu_mut(menu_id)?.deleted_at = Some(now_millis());
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn place_order(&self, order: NewOrder, change: StockChange) -> RepoResult<Order> {
        if order.quantity < 1 {
            return Err(RepoError::Validation(format!(
                "order quantity must be at least 1, got {}",
                order.quantity
            )));
        }

        let mut t = self.tables.lock();
        let now = now_millis();

        let menu = t.live_menu_mut(change.menu_id)?;
        if menu.quantity != change.previous {
            return Err(RepoError::Conflict(format!(
                "menu {} stock is {}, expected {}",
                menu.menu_id, menu.quantity, change.previous
            )));
        }
        menu.quantity = change.quantity;
        menu.status = change.status;
        menu.updated_at = now;

        t.last_order_id += 1;
        let order = Order {
            order_id: t.last_order_id,
            customer_id: order.customer_id,
            menu_id: order.menu_id,
            seller_id: order.seller_id,
            quantity: order.quantity,
            total_price: order.total_price,
            order_type: OrderState::Pending,
            created_at: now,
            updated_at: now,
        };
        t.orders.insert(order.order_id, order.clone());
        Ok(order)
    }

    async fn list_customer_orders(&self, customer_id: i64) -> RepoResult<Vec<Order>> {
        let t = self.tables.lock();
        let orders = t
            .orders
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        Ok(Tables::newest_first(orders))
    }

    async fn list_seller_pending(&self, seller_id: i64) -> RepoResult<Vec<Order>> {
        let t = self.tables.lock();
        let orders = t
            .orders
            .values()
            .filter(|o| o.seller_id == seller_id && o.order_type == OrderState::Pending)
            .cloned()
            .collect();
        Ok(Tables::newest_first(orders))
    }

    async fn resolve_order(&self, order_id: i64, outcome: OrderOutcome) -> RepoResult<Order> {
        let mut t = self.tables.lock();
        let now = now_millis();

        let order = t
            .orders
            .get(&order_id)
            .cloned()
            .ok_or_else(|| RepoError::NotFound(format!("Order {order_id}")))?;
        if order.order_type != OrderState::Pending {
            return Err(RepoError::Conflict(format!(
                "order {order_id} is already {}",
                order.order_type.as_str()
            )));
        }

        // Compute the restock before touching anything so a failure writes nothing
        let restock = match outcome {
            OrderOutcome::Accept => None,
            OrderOutcome::Cancel => {
                let menu = t
                    .menus
                    .get(&order.menu_id)
                    .ok_or_else(|| RepoError::NotFound(format!("Menu {}", order.menu_id)))?;
                let change = inventory::release(menu, order.quantity)
                    .map_err(|e| RepoError::Validation(e.to_string()))?;
                Some(change)
            }
        };

        if let Some(change) = restock {
            if let Some(menu) = t.menus.get_mut(&change.menu_id) {
                menu.quantity = change.quantity;
                menu.status = change.status;
                menu.updated_at = now;
            }
        }

        let stored = t
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| RepoError::NotFound(format!("Order {order_id}")))?;
        stored.order_type = outcome.target_state();
        stored.updated_at = now;
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seller_with_menu(store: &MemoryStore, stock: i32) -> (User, Menu) {
        let seller = store
            .create_user("boss", "hash", UserRole::Owner)
            .await
            .unwrap();
        let category = store
            .create_category(
                &seller,
                &CategoryCreate {
                    name: "Stews".into(),
                },
            )
            .await
            .unwrap();
        let menu = store
            .create_menu(
                &seller,
                category.category_id,
                &MenuCreate {
                    name: "Kimchi Stew".into(),
                    description: String::new(),
                    image: None,
                    price: 8000,
                    quantity: stock,
                },
            )
            .await
            .unwrap();
        (seller, menu)
    }

    fn new_order(menu: &Menu, quantity: i32) -> NewOrder {
        NewOrder {
            customer_id: 99,
            menu_id: menu.menu_id,
            seller_id: menu.user_id,
            quantity,
            total_price: menu.price * i64::from(quantity),
        }
    }

    #[tokio::test]
    async fn duplicate_nickname_is_rejected() {
        let store = MemoryStore::new();
        store
            .create_user("kim", "h", UserRole::Customer)
            .await
            .unwrap();
        let err = store
            .create_user("kim", "h", UserRole::Owner)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn stale_stock_change_writes_nothing() {
        let store = MemoryStore::new();
        let (_, menu) = seller_with_menu(&store, 5).await;

        let first = inventory::reserve(&menu, 3).unwrap();
        let second = inventory::reserve(&menu, 4).unwrap();

        store.place_order(new_order(&menu, 3), first).await.unwrap();
        let err = store
            .place_order(new_order(&menu, 4), second)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));

        let menu = store.find_menu(menu.menu_id).await.unwrap().unwrap();
        assert_eq!(menu.quantity, 2);
        assert_eq!(store.list_customer_orders(99).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancel_restocks_even_a_deleted_menu() {
        let store = MemoryStore::new();
        let (seller, menu) = seller_with_menu(&store, 2).await;
        let change = inventory::reserve(&menu, 2).unwrap();
        let order = store.place_order(new_order(&menu, 2), change).await.unwrap();

        store.delete_menu(menu.menu_id).await.unwrap();
        let cancelled = store
            .resolve_order(order.order_id, OrderOutcome::Cancel)
            .await
            .unwrap();
        assert_eq!(cancelled.order_type, OrderState::Cancel);

        let t = store.tables.lock();
        let restocked = &t.menus[&menu.menu_id];
        assert_eq!(restocked.quantity, 2);
        assert_eq!(restocked.status, MenuStatus::ForSale);
        drop(t);

        assert!(
            store
                .list_seller_pending(seller.user_id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn second_resolution_conflicts() {
        let store = MemoryStore::new();
        let (_, menu) = seller_with_menu(&store, 5).await;
        let change = inventory::reserve(&menu, 1).unwrap();
        let order = store.place_order(new_order(&menu, 1), change).await.unwrap();

        store
            .resolve_order(order.order_id, OrderOutcome::Accept)
            .await
            .unwrap();
        let err = store
            .resolve_order(order.order_id, OrderOutcome::Cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));

        // the rejected cancel must not have restocked
        let menu = store.find_menu(menu.menu_id).await.unwrap().unwrap();
        assert_eq!(menu.quantity, 4);
    }

    #[tokio::test]
    async fn reorder_shifts_taken_slot() {
        let store = MemoryStore::new();
        let owner = store
            .create_user("boss", "h", UserRole::Owner)
            .await
            .unwrap();
        let mut ids = Vec::new();
        for name in ["Rice", "Noodles", "Drinks"] {
            let c = store
                .create_category(&owner, &CategoryCreate { name: name.into() })
                .await
                .unwrap();
            ids.push(c.category_id);
        }

        store
            .update_category(
                ids[2],
                &CategoryUpdate {
                    name: None,
                    order: Some(1),
                },
            )
            .await
            .unwrap();

        let names: Vec<String> = store
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Drinks", "Rice", "Noodles"]);
    }

    #[tokio::test]
    async fn deleting_category_hides_its_menus() {
        let store = MemoryStore::new();
        let (_, menu) = seller_with_menu(&store, 5).await;

        store.delete_category(menu.category_id).await.unwrap();

        assert!(store.find_menu(menu.menu_id).await.unwrap().is_none());
        assert!(store.list_menus(menu.category_id).await.unwrap().is_empty());
        assert!(store.list_categories().await.unwrap().is_empty());
    }
}
