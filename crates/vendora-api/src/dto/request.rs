//! Request DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use vendora_core::types::id::ProductId;
use vendora_entity::order::{CustomerInfo, OrderStatus};

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlaceOrderRequest {
    /// Cart lines, in order.
    #[validate(length(min = 1, message = "Cart must contain at least one item"))]
    #[validate(nested)]
    pub items: Vec<OrderItemRequest>,
    /// Shipping snapshot from the checkout form.
    pub customer_info: CustomerInfo,
}

/// One cart line.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemRequest {
    /// Product to purchase.
    pub product: ProductId,
    /// Units to purchase.
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// Body of `PUT /api/orders/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    /// The status to move the order to.
    pub status: OrderStatus,
}

/// Body of `POST /api/inventory/upsert`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertInventoryRequest {
    /// The product to create or update the ledger entry for.
    pub product_id: ProductId,
    /// New available quantity; omitted keeps the current value.
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity_available: Option<i32>,
    /// New warehouse location; omitted keeps the current value.
    pub warehouse_location: Option<String>,
    /// New low-stock threshold; omitted keeps the current value.
    pub minimum_stock_alert: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_cart() {
        let req: PlaceOrderRequest = serde_json::from_value(serde_json::json!({
            "items": [],
            "customer_info": {
                "name": "Alex", "address": "1 Main St", "city": "Springfield",
                "zip": "12345", "country": "US", "phone": "555-0100",
                "email": "alex@example.com"
            }
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_quantity() {
        let req: PlaceOrderRequest = serde_json::from_value(serde_json::json!({
            "items": [{ "product": uuid::Uuid::new_v4(), "quantity": 0 }],
            "customer_info": {
                "name": "Alex", "address": "1 Main St", "city": "Springfield",
                "zip": "12345", "country": "US", "phone": "555-0100",
                "email": "alex@example.com"
            }
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_accepts_valid_cart() {
        let req: PlaceOrderRequest = serde_json::from_value(serde_json::json!({
            "items": [{ "product": uuid::Uuid::new_v4(), "quantity": 2 }],
            "customer_info": {
                "name": "Alex", "address": "1 Main St", "city": "Springfield",
                "zip": "12345", "country": "US", "phone": "555-0100",
                "email": "alex@example.com"
            }
        }))
        .unwrap();
        assert!(req.validate().is_ok());
    }
}
