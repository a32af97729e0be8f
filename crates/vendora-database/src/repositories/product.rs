//! Product repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use vendora_core::error::{AppError, ErrorKind};
use vendora_core::result::AppResult;
use vendora_entity::product::Product;

use crate::stores::ProductStore;

/// Repository for catalog lookups and the denormalized stock cache.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new product repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find product", e))
    }

    async fn sync_stock(&self, product_id: Uuid, stock: i32) -> AppResult<()> {
        sqlx::query("UPDATE products SET stock = $2 WHERE id = $1")
            .bind(product_id)
            .bind(stock)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to sync product stock", e)
            })?;
        Ok(())
    }
}
