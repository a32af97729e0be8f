//! Inventory ledger entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use vendora_core::types::id::ProductId;

/// Per-product available quantity tracked by the inventory ledger.
///
/// `quantity_available` never goes negative: every deduction happens
/// through a conditional atomic decrement paired with exactly one order
/// line item.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryRecord {
    /// Row identifier.
    pub id: Uuid,
    /// The product this ledger entry tracks (unique).
    pub product_id: Uuid,
    /// Units currently available for reservation.
    pub quantity_available: i32,
    /// Physical warehouse location label.
    pub warehouse_location: Option<String>,
    /// Threshold below which a low-stock alert is raised.
    pub minimum_stock_alert: Option<i32>,
    /// Last explicit restock time. Untouched by reservations.
    pub last_restocked_date: DateTime<Utc>,
}

impl InventoryRecord {
    /// Whether the available quantity has fallen below the configured
    /// minimum-stock alert threshold.
    pub fn is_below_minimum(&self) -> bool {
        match self.minimum_stock_alert {
            Some(min) => self.quantity_available < min,
            None => false,
        }
    }
}

/// Create-or-merge input for the inventory ledger. Unset fields keep
/// their previous values on merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryUpsert {
    /// The product to create or update the ledger entry for.
    pub product_id: ProductId,
    /// New available quantity.
    pub quantity_available: Option<i32>,
    /// New warehouse location.
    pub warehouse_location: Option<String>,
    /// New low-stock threshold.
    pub minimum_stock_alert: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(quantity: i32, min: Option<i32>) -> InventoryRecord {
        InventoryRecord {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity_available: quantity,
            warehouse_location: None,
            minimum_stock_alert: min,
            last_restocked_date: Utc::now(),
        }
    }

    #[test]
    fn test_below_minimum() {
        assert!(record(2, Some(5)).is_below_minimum());
        assert!(!record(5, Some(5)).is_below_minimum());
        assert!(!record(0, None).is_below_minimum());
    }
}
