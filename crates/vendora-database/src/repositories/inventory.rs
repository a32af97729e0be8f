//! Inventory ledger repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use vendora_core::error::{AppError, ErrorKind};
use vendora_core::result::AppResult;
use vendora_entity::inventory::{InventoryRecord, InventoryUpsert};

use crate::stores::InventoryStore;

/// Repository for the per-product inventory ledger.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    /// Create a new inventory repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryStore for InventoryRepository {
    async fn find_by_product(&self, product_id: Uuid) -> AppResult<Option<InventoryRecord>> {
        sqlx::query_as::<_, InventoryRecord>("SELECT * FROM inventory WHERE product_id = $1")
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find inventory", e))
    }

    async fn reserve(&self, product_id: Uuid, quantity: i32) -> AppResult<bool> {
        // Single conditional decrement; concurrent reservations for the
        // last units race on the WHERE clause, so at most one wins.
        // `last_restocked_date` is untouched on reserve.
        let result = sqlx::query(
            "UPDATE inventory SET quantity_available = quantity_available - $2 \
             WHERE product_id = $1 AND quantity_available >= $2",
        )
        .bind(product_id)
        .bind(quantity)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to reserve inventory", e)
        })?;

        Ok(result.rows_affected() == 1)
    }

    async fn release(&self, product_id: Uuid, quantity: i32) -> AppResult<()> {
        sqlx::query(
            "UPDATE inventory SET quantity_available = quantity_available + $2 \
             WHERE product_id = $1",
        )
        .bind(product_id)
        .bind(quantity)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to release inventory", e)
        })?;
        Ok(())
    }

    async fn upsert(&self, upsert: &InventoryUpsert) -> AppResult<InventoryRecord> {
        sqlx::query_as::<_, InventoryRecord>(
            "INSERT INTO inventory (id, product_id, quantity_available, warehouse_location, \
             minimum_stock_alert, last_restocked_date) \
             VALUES ($1, $2, COALESCE($3, 0), $4, $5, NOW()) \
             ON CONFLICT (product_id) DO UPDATE SET \
                 quantity_available = COALESCE($3, inventory.quantity_available), \
                 warehouse_location = COALESCE($4, inventory.warehouse_location), \
                 minimum_stock_alert = COALESCE($5, inventory.minimum_stock_alert), \
                 last_restocked_date = NOW() \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(upsert.product_id.into_uuid())
        .bind(upsert.quantity_available)
        .bind(&upsert.warehouse_location)
        .bind(upsert.minimum_stock_alert)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert inventory", e))
    }
}
