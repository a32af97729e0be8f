//! Inventory ledger service: upsert and read operations.
//!
//! Reservation and compensating release happen inside order placement;
//! this service covers the explicit restock/read surface.

use std::sync::Arc;

use uuid::Uuid;

use vendora_core::error::AppError;
use vendora_core::result::AppResult;
use vendora_database::stores::{InventoryStore, ProductStore};
use vendora_entity::inventory::{InventoryRecord, InventoryUpsert};
use vendora_entity::user::UserRole;

use crate::context::RequestContext;

/// Manages the per-product inventory ledger.
#[derive(Debug)]
pub struct InventoryService {
    /// The inventory ledger.
    inventory: Arc<dyn InventoryStore>,
    /// Catalog access for the denormalized stock cache.
    products: Arc<dyn ProductStore>,
}

impl InventoryService {
    /// Creates a new inventory service.
    pub fn new(inventory: Arc<dyn InventoryStore>, products: Arc<dyn ProductStore>) -> Self {
        Self {
            inventory,
            products,
        }
    }

    /// Creates or merges a ledger entry, then unconditionally syncs the
    /// product's denormalized `stock` field.
    ///
    /// Unset fields keep their previous values. Admins and sellers only.
    pub async fn upsert(
        &self,
        ctx: &RequestContext,
        upsert: InventoryUpsert,
    ) -> AppResult<InventoryRecord> {
        if !matches!(ctx.role, UserRole::Admin | UserRole::Seller) {
            return Err(AppError::forbidden("Only admins and sellers manage inventory"));
        }

        let product_id = upsert.product_id.into_uuid();
        if self.products.find_by_id(product_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Product {product_id} not found"
            )));
        }

        let record = self.inventory.upsert(&upsert).await?;
        self.products
            .sync_stock(record.product_id, record.quantity_available)
            .await?;

        Ok(record)
    }

    /// Fetches the ledger entry for a product.
    pub async fn get_by_product(&self, product_id: Uuid) -> AppResult<InventoryRecord> {
        self.inventory
            .find_by_product(product_id)
            .await?
            .ok_or_else(|| AppError::not_found("Inventory not found"))
    }
}
