//! Store traits consumed by the service layer.
//!
//! The primary document store is an external collaborator to the business
//! logic, so each entity gets a narrow async trait here and a concrete
//! sqlx repository in [`crate::repositories`]. Service-level tests run
//! against in-memory implementations of the same traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use vendora_core::result::AppResult;
use vendora_core::types::pagination::{PageRequest, PageResponse};
use vendora_entity::inventory::{InventoryRecord, InventoryUpsert};
use vendora_entity::notification::{Notification, NotificationRef};
use vendora_entity::order::{NewOrder, Order, OrderItem, OrderStatus};
use vendora_entity::product::Product;
use vendora_entity::user::{User, UserRole};

/// Read access to marketplace accounts.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find every user holding a role. Dispatch to admins resolves its
    /// recipients through this — zero or many admins are both fine.
    async fn find_by_role(&self, role: UserRole) -> AppResult<Vec<User>>;
}

/// Read/write access to the product catalog, keyed by product id.
#[async_trait]
pub trait ProductStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a product by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// Overwrite the denormalized `stock` cache on the product row.
    /// Best-effort convenience for reads; the ledger stays authoritative.
    async fn sync_stock(&self, product_id: Uuid, stock: i32) -> AppResult<()>;
}

/// The inventory ledger: per-product available quantity.
#[async_trait]
pub trait InventoryStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find the ledger entry for a product.
    async fn find_by_product(&self, product_id: Uuid) -> AppResult<Option<InventoryRecord>>;

    /// Atomically decrement `quantity_available` by `quantity` if at
    /// least that much is available. Returns `false` when stock is
    /// insufficient (or no ledger entry exists). Implementations MUST use
    /// the store's native conditional update — never read-then-write.
    async fn reserve(&self, product_id: Uuid, quantity: i32) -> AppResult<bool>;

    /// Re-increment `quantity_available`; compensation for a reservation
    /// whose enclosing order placement failed.
    async fn release(&self, product_id: Uuid, quantity: i32) -> AppResult<()>;

    /// Create or merge a ledger entry. Unset fields keep their previous
    /// values; `last_restocked_date` is bumped.
    async fn upsert(&self, upsert: &InventoryUpsert) -> AppResult<InventoryRecord>;
}

/// Orders and their embedded line items.
#[async_trait]
pub trait OrderStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist an order and its line items as one transaction.
    async fn create(&self, new_order: &NewOrder) -> AppResult<(Order, Vec<OrderItem>)>;

    /// Fetch an order with its items.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<(Order, Vec<OrderItem>)>>;

    /// All orders placed by a buyer, newest first.
    async fn list_by_buyer(&self, buyer_id: Uuid) -> AppResult<Vec<(Order, Vec<OrderItem>)>>;

    /// All orders containing at least one item sold by `seller_id`,
    /// newest first. Items are NOT filtered here.
    async fn list_by_seller(&self, seller_id: Uuid) -> AppResult<Vec<(Order, Vec<OrderItem>)>>;

    /// Set the order-level status.
    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<()>;

    /// Delete an order and its items. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Primary-store notification records.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a notification row.
    async fn create(&self, notification: &Notification) -> AppResult<()>;

    /// Find by primary id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Notification>>;

    /// Find by the mirror document id stored in `live_id`.
    async fn find_by_live_id(&self, live_id: &str) -> AppResult<Option<Notification>>;

    /// Record the mirror document id after a successful mirror write.
    async fn set_live_id(&self, id: Uuid, live_id: &str) -> AppResult<()>;

    /// Notifications addressed to a user, newest first.
    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    /// Notifications addressed to a role, newest first. Admins read the
    /// shared admin feed through this.
    async fn list_for_role(
        &self,
        role: UserRole,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    /// Mark one notification seen.
    async fn mark_seen(&self, id: Uuid) -> AppResult<()>;

    /// Mark all of a recipient's unseen notifications seen; returns the
    /// updated rows so their mirrors can be patched in one batch.
    async fn mark_all_seen(&self, recipient_id: Uuid) -> AppResult<Vec<Notification>>;

    /// Delete a notification row. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Rows never mirrored (`live_id IS NULL`) created before `older_than`,
    /// oldest first, capped at `limit`. Feeds the reconciliation sweep.
    async fn find_unmirrored(
        &self,
        older_than: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Notification>>;

    /// Delete rows created before `cutoff`; returns them so their mirrors
    /// can be removed too.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Notification>>;

    /// Resolve a client-supplied identifier that may be either store's
    /// native id: primary-store lookup first, then mirror-id fallback.
    async fn find_by_ref(&self, reference: &NotificationRef) -> AppResult<Option<Notification>> {
        match reference {
            NotificationRef::Primary(id) => {
                if let Some(found) = self.find_by_id(id.into_uuid()).await? {
                    return Ok(Some(found));
                }
                self.find_by_live_id(&id.to_string()).await
            }
            NotificationRef::Mirror(id) => self.find_by_live_id(id).await,
        }
    }
}
