//! Order repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use vendora_core::error::{AppError, ErrorKind};
use vendora_core::result::AppResult;
use vendora_entity::order::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};

use crate::stores::OrderStore;

/// Repository for orders and their embedded line items.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn items_for(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        // `seq` preserves cart order; item ids are random.
        sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY seq",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list order items", e))
    }

    async fn with_items(&self, orders: Vec<Order>) -> AppResult<Vec<(Order, Vec<OrderItem>)>> {
        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.items_for(order.id).await?;
            result.push((order, items));
        }
        Ok(result)
    }

    async fn insert_item(
        tx: &mut Transaction<'_, Postgres>,
        order_id: Uuid,
        item: &NewOrderItem,
    ) -> AppResult<OrderItem> {
        sqlx::query_as::<_, OrderItem>(
            "INSERT INTO order_items (id, order_id, product_id, quantity, price, seller_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.price)
        .bind(item.seller_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert order item", e))
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn create(&self, new_order: &NewOrder) -> AppResult<(Order, Vec<OrderItem>)> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let order = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (id, buyer_id, customer_info, total_amount, status, \
             payment_status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(new_order.buyer_id)
        .bind(Json(&new_order.customer_info))
        .bind(new_order.total_amount)
        .bind(new_order.status)
        .bind(new_order.payment_status)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert order", e))?;

        let mut items = Vec::with_capacity(new_order.items.len());
        for item in &new_order.items {
            items.push(Self::insert_item(&mut tx, order.id, item).await?);
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit order", e)
        })?;

        Ok((order, items))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<(Order, Vec<OrderItem>)>> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find order", e))?;

        match order {
            Some(order) => {
                let items = self.items_for(order.id).await?;
                Ok(Some((order, items)))
            }
            None => Ok(None),
        }
    }

    async fn list_by_buyer(&self, buyer_id: Uuid) -> AppResult<Vec<(Order, Vec<OrderItem>)>> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE buyer_id = $1 ORDER BY created_at DESC",
        )
        .bind(buyer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list buyer orders", e)
        })?;

        self.with_items(orders).await
    }

    async fn list_by_seller(&self, seller_id: Uuid) -> AppResult<Vec<(Order, Vec<OrderItem>)>> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT DISTINCT o.* FROM orders o \
             JOIN order_items i ON i.order_id = o.id \
             WHERE i.seller_id = $1 ORDER BY o.created_at DESC",
        )
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list seller orders", e)
        })?;

        self.with_items(orders).await
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<()> {
        sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update order status", e)
            })?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        // order_items rows go with the order via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete order", e))?;
        Ok(result.rows_affected() > 0)
    }
}
