//! Order assembler: validates a cart against catalog and inventory and
//! builds the immutable line items.
//!
//! This pass is strictly read-only — assembly failures never mutate
//! state. Actual reservation happens in the orchestrator afterwards.

use rust_decimal::Decimal;
use uuid::Uuid;

use vendora_core::error::AppError;
use vendora_core::result::AppResult;
use vendora_database::stores::{InventoryStore, ProductStore};
use vendora_entity::order::NewOrderItem;

/// One cart line as submitted by the buyer.
#[derive(Debug, Clone)]
pub struct CartItem {
    /// The product to purchase.
    pub product_id: Uuid,
    /// Units to purchase.
    pub quantity: i32,
}

/// The validated cart, ready for reservation and persistence.
#[derive(Debug, Clone)]
pub struct AssembledOrder {
    /// Line items in cart order, with price and seller snapshotted.
    pub items: Vec<NewOrderItem>,
    /// Sum of `price * quantity` over the items.
    pub total_amount: Decimal,
}

/// Validate each cart line in input order and snapshot it into a line
/// item.
///
/// Per line: resolve the product (`NotFound` named by id), read the
/// ledger (`InsufficientStock` named by product name), then accumulate
/// the total. Any failure aborts the whole cart — no partial order.
pub async fn assemble(
    products: &dyn ProductStore,
    inventory: &dyn InventoryStore,
    cart: &[CartItem],
) -> AppResult<AssembledOrder> {
    if cart.is_empty() {
        return Err(AppError::validation("Cart is empty"));
    }

    let mut items = Vec::with_capacity(cart.len());
    let mut total_amount = Decimal::ZERO;

    for line in cart {
        if line.quantity <= 0 {
            return Err(AppError::validation(format!(
                "Quantity must be positive for product {}",
                line.product_id
            )));
        }

        let product = products
            .find_by_id(line.product_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Product {} not found", line.product_id))
            })?;

        let available = inventory
            .find_by_product(product.id)
            .await?
            .map(|record| record.quantity_available)
            .unwrap_or(0);
        if available < line.quantity {
            return Err(AppError::insufficient_stock(format!(
                "Insufficient stock for {}",
                product.name
            )));
        }

        let item = NewOrderItem {
            product_id: product.id,
            quantity: line.quantity,
            price: product.price,
            seller_id: product.seller_id,
            product_name: product.name,
        };
        total_amount += item.line_total();
        items.push(item);
    }

    Ok(AssembledOrder {
        items,
        total_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use std::str::FromStr;
    use vendora_core::error::ErrorKind;
    use vendora_entity::user::UserRole;

    #[tokio::test]
    async fn test_total_and_snapshots() {
        let env = TestEnv::new();
        let s1 = env.add_user("Sara", UserRole::Seller);
        let s2 = env.add_user("Tom", UserRole::Seller);
        let a = env.add_product("Product A", "10.00", s1.id);
        let b = env.add_product("Product B", "5.00", s2.id);
        env.add_inventory(a.id, 5, None);
        env.add_inventory(b.id, 5, None);

        let cart = vec![
            CartItem { product_id: a.id, quantity: 2 },
            CartItem { product_id: b.id, quantity: 1 },
        ];
        let assembled = assemble(env.products.as_ref(), env.inventory.as_ref(), &cart)
            .await
            .unwrap();

        assert_eq!(assembled.items.len(), 2);
        assert_eq!(assembled.total_amount, Decimal::from_str("25.00").unwrap());
        assert_eq!(assembled.items[0].seller_id, s1.id);
        assert_eq!(assembled.items[1].seller_id, s2.id);
        assert_eq!(assembled.items[0].price, Decimal::from_str("10.00").unwrap());
    }

    #[tokio::test]
    async fn test_unknown_product_aborts_whole_cart() {
        let env = TestEnv::new();
        let seller = env.add_user("Sara", UserRole::Seller);
        let a = env.add_product("Product A", "10.00", seller.id);
        env.add_inventory(a.id, 5, None);
        let missing = Uuid::new_v4();

        let cart = vec![
            CartItem { product_id: a.id, quantity: 1 },
            CartItem { product_id: missing, quantity: 1 },
        ];
        let err = assemble(env.products.as_ref(), env.inventory.as_ref(), &cart)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.contains(&missing.to_string()));
    }

    #[tokio::test]
    async fn test_insufficient_stock_names_product() {
        let env = TestEnv::new();
        let seller = env.add_user("Sara", UserRole::Seller);
        let a = env.add_product("Blue Mug", "10.00", seller.id);
        env.add_inventory(a.id, 1, None);

        let cart = vec![CartItem { product_id: a.id, quantity: 2 }];
        let err = assemble(env.products.as_ref(), env.inventory.as_ref(), &cart)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InsufficientStock);
        assert_eq!(err.message, "Insufficient stock for Blue Mug");
    }

    #[tokio::test]
    async fn test_missing_ledger_entry_counts_as_no_stock() {
        let env = TestEnv::new();
        let seller = env.add_user("Sara", UserRole::Seller);
        let a = env.add_product("Blue Mug", "10.00", seller.id);

        let cart = vec![CartItem { product_id: a.id, quantity: 1 }];
        let err = assemble(env.products.as_ref(), env.inventory.as_ref(), &cart)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InsufficientStock);
    }

    #[tokio::test]
    async fn test_rejects_non_positive_quantity() {
        let env = TestEnv::new();
        let seller = env.add_user("Sara", UserRole::Seller);
        let a = env.add_product("Blue Mug", "10.00", seller.id);
        env.add_inventory(a.id, 5, None);

        let cart = vec![CartItem { product_id: a.id, quantity: 0 }];
        let err = assemble(env.products.as_ref(), env.inventory.as_ref(), &cart)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
