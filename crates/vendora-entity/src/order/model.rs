//! Order entity model and its embedded line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use crate::user::UserSummary;

use super::status::{OrderStatus, PaymentStatus};

/// Shipping snapshot captured from the checkout form at placement time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    pub email: String,
}

/// A placed order.
///
/// `total_amount` equals the sum of `price * quantity` over the line
/// items, computed once at creation and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    /// Unique order identifier.
    pub id: Uuid,
    /// The buyer who placed the order.
    pub buyer_id: Uuid,
    /// Shipping snapshot.
    pub customer_info: Json<CustomerInfo>,
    /// Total computed at assembly time.
    pub total_amount: Decimal,
    /// Order-level fulfilment status.
    pub status: OrderStatus,
    /// Payment state.
    pub payment_status: PaymentStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

/// One line item of an order. Immutable after creation: product price and
/// seller are snapshots taken at assembly time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    /// Row identifier.
    pub id: Uuid,
    /// Owning order.
    pub order_id: Uuid,
    /// The purchased product.
    pub product_id: Uuid,
    /// Units purchased.
    pub quantity: i32,
    /// Unit price at assembly time.
    pub price: Decimal,
    /// Seller of record at assembly time.
    pub seller_id: Uuid,
}

/// Line item input produced by the order assembler, before the order row
/// exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    /// The purchased product.
    pub product_id: Uuid,
    /// Units purchased.
    pub quantity: i32,
    /// Unit price snapshot.
    pub price: Decimal,
    /// Seller snapshot.
    pub seller_id: Uuid,
    /// Product name at assembly time, carried for notification fan-out.
    pub product_name: String,
}

impl NewOrderItem {
    /// Line subtotal.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A fully assembled order ready for persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    /// The buyer placing the order.
    pub buyer_id: Uuid,
    /// Shipping snapshot.
    pub customer_info: CustomerInfo,
    /// Assembled line items, in cart order.
    pub items: Vec<NewOrderItem>,
    /// Total computed by the assembler.
    pub total_amount: Decimal,
    /// Initial status.
    pub status: OrderStatus,
    /// Initial payment state.
    pub payment_status: PaymentStatus,
}

/// A populated order as returned to clients: buyer and per-item seller
/// resolved to display summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetails {
    pub id: Uuid,
    pub buyer: UserSummary,
    pub customer_info: CustomerInfo,
    pub items: Vec<OrderItemDetails>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

/// A populated line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemDetails {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub seller: UserSummary,
}

/// A seller's view of an order: items filtered to that seller, with a
/// per-seller subtotal alongside the order total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerOrderView {
    pub id: Uuid,
    pub buyer: UserSummary,
    pub customer_info: CustomerInfo,
    pub items: Vec<OrderItemDetails>,
    pub seller_total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_line_total() {
        let item = NewOrderItem {
            product_id: Uuid::new_v4(),
            quantity: 3,
            price: Decimal::from_str("9.99").unwrap(),
            seller_id: Uuid::new_v4(),
            product_name: "Blue Mug".to_string(),
        };
        assert_eq!(item.line_total(), Decimal::from_str("29.97").unwrap());
    }
}
