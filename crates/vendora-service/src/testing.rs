//! In-memory store fakes and fixtures for service-level tests.
//!
//! The fakes implement the same store traits as the sqlx repositories.
//! Every conditional mutation happens under one lock per store, so the
//! inventory fake honors the same atomic-decrement contract the real
//! ledger relies on — the concurrency scenarios test real interleavings.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use vendora_core::error::AppError;
use vendora_core::result::AppResult;
use vendora_core::traits::{LiveStore, LiveWrite};
use vendora_core::types::pagination::{PageRequest, PageResponse};
use vendora_database::stores::{
    InventoryStore, NotificationStore, OrderStore, ProductStore, UserStore,
};
use vendora_entity::inventory::{InventoryRecord, InventoryUpsert};
use vendora_entity::notification::{Notification, NotificationKind};
use vendora_entity::order::{CustomerInfo, NewOrder, Order, OrderItem, OrderStatus};
use vendora_entity::product::{Product, ProductStatus};
use vendora_entity::user::{User, UserRole};

use crate::context::RequestContext;

/// Bundle of fakes wired the way `main` wires the real repositories.
#[derive(Debug)]
pub struct TestEnv {
    pub users: Arc<InMemoryUsers>,
    pub products: Arc<InMemoryProducts>,
    pub inventory: Arc<InMemoryInventory>,
    pub orders: Arc<InMemoryOrders>,
    pub notifications: Arc<InMemoryNotifications>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            users: Arc::new(InMemoryUsers::default()),
            products: Arc::new(InMemoryProducts::default()),
            inventory: Arc::new(InMemoryInventory::default()),
            orders: Arc::new(InMemoryOrders::default()),
            notifications: Arc::new(InMemoryNotifications::default()),
        }
    }

    pub fn add_user(&self, name: &str, role: UserRole) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.users
            .rows
            .lock()
            .unwrap()
            .insert(user.id, user.clone());
        user
    }

    pub fn add_product(&self, name: &str, price: &str, seller_id: Uuid) -> Product {
        let product = Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{name} description"),
            price: Decimal::from_str(price).unwrap(),
            stock: 0,
            seller_id,
            status: ProductStatus::Approved,
            created_at: Utc::now(),
        };
        self.products
            .rows
            .lock()
            .unwrap()
            .insert(product.id, product.clone());
        product
    }

    pub fn add_inventory(
        &self,
        product_id: Uuid,
        quantity: i32,
        minimum_stock_alert: Option<i32>,
    ) -> InventoryRecord {
        let record = InventoryRecord {
            id: Uuid::new_v4(),
            product_id,
            quantity_available: quantity,
            warehouse_location: None,
            minimum_stock_alert,
            last_restocked_date: Utc::now(),
        };
        self.inventory
            .rows
            .lock()
            .unwrap()
            .insert(product_id, record.clone());
        record
    }
}

pub fn ctx_for(user_id: Uuid, role: UserRole) -> RequestContext {
    RequestContext::new(user_id, role, "Alex".to_string(), "alex@example.com".to_string())
}

pub fn customer_info() -> CustomerInfo {
    CustomerInfo {
        name: "Alex Doe".to_string(),
        address: "1 Main St".to_string(),
        city: "Springfield".to_string(),
        zip: "12345".to_string(),
        country: "US".to_string(),
        phone: "555-0100".to_string(),
        email: "alex@example.com".to_string(),
    }
}

/// A fresh unseen, unmirrored notification addressed to `recipient`.
pub fn notification_for(recipient: Uuid) -> Notification {
    Notification {
        id: Uuid::new_v4(),
        title: "New Order Placed".to_string(),
        message: "Order placed".to_string(),
        kind: NotificationKind::Orders,
        product_id: None,
        sender_id: None,
        recipient_id: recipient,
        recipient_role: None,
        seen: false,
        meta: None,
        created_at: Utc::now(),
        live_id: None,
    }
}

fn paginate(rows: Vec<Notification>, page: &PageRequest) -> PageResponse<Notification> {
    let total = rows.len() as u64;
    let items = rows
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    PageResponse::new(items, page.page, page.page_size, total)
}

// ── Users ────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryUsers {
    pub rows: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserStore for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.role == role)
            .cloned()
            .collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }
}

// ── Products ─────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryProducts {
    pub rows: Mutex<HashMap<Uuid, Product>>,
}

impl InMemoryProducts {
    pub fn get(&self, id: Uuid) -> Product {
        self.rows.lock().unwrap().get(&id).cloned().unwrap()
    }

    pub fn set_price(&self, id: Uuid, price: &str) {
        self.rows.lock().unwrap().get_mut(&id).unwrap().price = Decimal::from_str(price).unwrap();
    }
}

#[async_trait]
impl ProductStore for InMemoryProducts {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn sync_stock(&self, product_id: Uuid, stock: i32) -> AppResult<()> {
        if let Some(product) = self.rows.lock().unwrap().get_mut(&product_id) {
            product.stock = stock;
        }
        Ok(())
    }
}

// ── Inventory ────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryInventory {
    pub rows: Mutex<HashMap<Uuid, InventoryRecord>>,
}

impl InMemoryInventory {
    pub fn quantity(&self, product_id: Uuid) -> i32 {
        self.rows
            .lock()
            .unwrap()
            .get(&product_id)
            .map(|r| r.quantity_available)
            .unwrap_or(0)
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventory {
    async fn find_by_product(&self, product_id: Uuid) -> AppResult<Option<InventoryRecord>> {
        Ok(self.rows.lock().unwrap().get(&product_id).cloned())
    }

    async fn reserve(&self, product_id: Uuid, quantity: i32) -> AppResult<bool> {
        // Check-and-decrement under one lock, like the SQL conditional
        // UPDATE the repository issues.
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&product_id) {
            Some(record) if record.quantity_available >= quantity => {
                record.quantity_available -= quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release(&self, product_id: Uuid, quantity: i32) -> AppResult<()> {
        if let Some(record) = self.rows.lock().unwrap().get_mut(&product_id) {
            record.quantity_available += quantity;
        }
        Ok(())
    }

    async fn upsert(&self, upsert: &InventoryUpsert) -> AppResult<InventoryRecord> {
        let product_id = upsert.product_id.into_uuid();
        let mut rows = self.rows.lock().unwrap();
        let record = rows
            .entry(product_id)
            .and_modify(|record| {
                if let Some(quantity) = upsert.quantity_available {
                    record.quantity_available = quantity;
                }
                if let Some(location) = &upsert.warehouse_location {
                    record.warehouse_location = Some(location.clone());
                }
                if let Some(min) = upsert.minimum_stock_alert {
                    record.minimum_stock_alert = Some(min);
                }
                record.last_restocked_date = Utc::now();
            })
            .or_insert_with(|| InventoryRecord {
                id: Uuid::new_v4(),
                product_id,
                quantity_available: upsert.quantity_available.unwrap_or(0),
                warehouse_location: upsert.warehouse_location.clone(),
                minimum_stock_alert: upsert.minimum_stock_alert,
                last_restocked_date: Utc::now(),
            });
        Ok(record.clone())
    }
}

/// Inventory wrapper that reports plenty of stock on reads but refuses to
/// reserve one product — simulates a rival buyer draining it between
/// assembly and reservation.
#[derive(Debug)]
pub struct DepletedOnReserve {
    pub inner: Arc<InMemoryInventory>,
    pub fail_product: Uuid,
}

#[async_trait]
impl InventoryStore for DepletedOnReserve {
    async fn find_by_product(&self, product_id: Uuid) -> AppResult<Option<InventoryRecord>> {
        self.inner.find_by_product(product_id).await
    }

    async fn reserve(&self, product_id: Uuid, quantity: i32) -> AppResult<bool> {
        if product_id == self.fail_product {
            return Ok(false);
        }
        self.inner.reserve(product_id, quantity).await
    }

    async fn release(&self, product_id: Uuid, quantity: i32) -> AppResult<()> {
        self.inner.release(product_id, quantity).await
    }

    async fn upsert(&self, upsert: &InventoryUpsert) -> AppResult<InventoryRecord> {
        self.inner.upsert(upsert).await
    }
}

// ── Orders ───────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryOrders {
    pub rows: Mutex<Vec<(Order, Vec<OrderItem>)>>,
}

impl InMemoryOrders {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrders {
    async fn create(&self, new_order: &NewOrder) -> AppResult<(Order, Vec<OrderItem>)> {
        let order = Order {
            id: Uuid::new_v4(),
            buyer_id: new_order.buyer_id,
            customer_info: sqlx::types::Json(new_order.customer_info.clone()),
            total_amount: new_order.total_amount,
            status: new_order.status,
            payment_status: new_order.payment_status,
            created_at: Utc::now(),
        };
        let items: Vec<OrderItem> = new_order
            .items
            .iter()
            .map(|item| OrderItem {
                id: Uuid::new_v4(),
                order_id: order.id,
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
                seller_id: item.seller_id,
            })
            .collect();
        self.rows
            .lock()
            .unwrap()
            .push((order.clone(), items.clone()));
        Ok((order, items))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<(Order, Vec<OrderItem>)>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|(order, _)| order.id == id)
            .cloned())
    }

    async fn list_by_buyer(&self, buyer_id: Uuid) -> AppResult<Vec<(Order, Vec<OrderItem>)>> {
        let mut orders: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(order, _)| order.buyer_id == buyer_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.0.created_at.cmp(&a.0.created_at));
        Ok(orders)
    }

    async fn list_by_seller(&self, seller_id: Uuid) -> AppResult<Vec<(Order, Vec<OrderItem>)>> {
        let mut orders: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, items)| items.iter().any(|i| i.seller_id == seller_id))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.0.created_at.cmp(&a.0.created_at));
        Ok(orders)
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<()> {
        if let Some((order, _)) = self
            .rows
            .lock()
            .unwrap()
            .iter_mut()
            .find(|(order, _)| order.id == id)
        {
            order.status = status;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|(order, _)| order.id != id);
        Ok(rows.len() < before)
    }
}

// ── Notifications ────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryNotifications {
    pub rows: Mutex<Vec<Notification>>,
}

impl InMemoryNotifications {
    pub fn all(&self) -> Vec<Notification> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotifications {
    async fn create(&self, notification: &Notification) -> AppResult<()> {
        self.rows.lock().unwrap().push(notification.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Notification>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|n| n.id == id)
            .cloned())
    }

    async fn find_by_live_id(&self, live_id: &str) -> AppResult<Option<Notification>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|n| n.live_id.as_deref() == Some(live_id))
            .cloned())
    }

    async fn set_live_id(&self, id: Uuid, live_id: &str) -> AppResult<()> {
        if let Some(notification) = self.rows.lock().unwrap().iter_mut().find(|n| n.id == id) {
            notification.live_id = Some(live_id.to_string());
        }
        Ok(())
    }

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let mut rows: Vec<Notification> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(rows, page))
    }

    async fn list_for_role(
        &self,
        role: UserRole,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let mut rows: Vec<Notification> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.recipient_role == Some(role))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(rows, page))
    }

    async fn mark_seen(&self, id: Uuid) -> AppResult<()> {
        if let Some(notification) = self.rows.lock().unwrap().iter_mut().find(|n| n.id == id) {
            notification.seen = true;
        }
        Ok(())
    }

    async fn mark_all_seen(&self, recipient_id: Uuid) -> AppResult<Vec<Notification>> {
        let mut updated = Vec::new();
        for notification in self.rows.lock().unwrap().iter_mut() {
            if notification.recipient_id == recipient_id && !notification.seen {
                notification.seen = true;
                updated.push(notification.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|n| n.id != id);
        Ok(rows.len() < before)
    }

    async fn find_unmirrored(
        &self,
        older_than: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Notification>> {
        let mut rows: Vec<Notification> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.live_id.is_none() && n.created_at < older_than)
            .cloned()
            .collect();
        rows.sort_by_key(|n| n.created_at);
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Notification>> {
        let mut rows = self.rows.lock().unwrap();
        let (old, keep): (Vec<Notification>, Vec<Notification>) =
            rows.drain(..).partition(|n| n.created_at < cutoff);
        *rows = keep;
        Ok(old)
    }
}

// ── Live store ───────────────────────────────────────────────

/// Live store that rejects every operation, for partial-failure paths.
#[derive(Debug)]
pub struct FailingLiveStore;

#[async_trait]
impl LiveStore for FailingLiveStore {
    async fn add_document(&self, _: &str, _: &serde_json::Value) -> AppResult<String> {
        Err(AppError::live_store("live store unavailable"))
    }

    async fn get_document(&self, _: &str, _: &str) -> AppResult<Option<serde_json::Value>> {
        Err(AppError::live_store("live store unavailable"))
    }

    async fn update_document(&self, _: &str, _: &str, _: &serde_json::Value) -> AppResult<()> {
        Err(AppError::live_store("live store unavailable"))
    }

    async fn delete_document(&self, _: &str, _: &str) -> AppResult<()> {
        Err(AppError::live_store("live store unavailable"))
    }

    async fn apply_batch(&self, _: &str, _: &[LiveWrite]) -> AppResult<()> {
        Err(AppError::live_store("live store unavailable"))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(false)
    }
}
