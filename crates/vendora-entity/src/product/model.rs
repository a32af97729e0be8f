//! Product entity model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::ProductStatus;

/// A catalog product listed by a seller.
///
/// Orders snapshot `price` and `seller_id` at purchase time; later edits
/// to the product never retroactively affect past orders.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    /// Unique product identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// Current unit price.
    pub price: Decimal,
    /// Denormalized stock count mirrored from the inventory ledger.
    /// Read convenience only — never authoritative.
    pub stock: i32,
    /// The seller who listed this product.
    pub seller_id: Uuid,
    /// Admin approval status.
    pub status: ProductStatus,
    /// When the product was listed.
    pub created_at: DateTime<Utc>,
}
