//! Order placement orchestrator and order projections.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use vendora_core::error::AppError;
use vendora_core::result::AppResult;
use vendora_core::types::id::{OrderId, ProductId, UserId};
use vendora_database::stores::{InventoryStore, OrderStore, ProductStore, UserStore};
use vendora_entity::notification::{NewNotification, NotificationKind};
use vendora_entity::order::{
    CustomerInfo, NewOrder, NewOrderItem, Order, OrderDetails, OrderItem, OrderItemDetails,
    OrderStatus, PaymentStatus, SellerOrderView,
};
use vendora_entity::user::{UserRole, UserSummary};

use crate::context::RequestContext;
use crate::notification::NotificationDispatcher;

use super::assembler::{self, CartItem};

/// Orchestrates order placement and owns the order read projections.
#[derive(Debug)]
pub struct OrderService {
    /// Orders and their line items.
    orders: Arc<dyn OrderStore>,
    /// Catalog lookups.
    products: Arc<dyn ProductStore>,
    /// The inventory ledger.
    inventory: Arc<dyn InventoryStore>,
    /// Account lookups for display summaries.
    users: Arc<dyn UserStore>,
    /// Dual-store notification dispatch.
    dispatcher: Arc<NotificationDispatcher>,
}

impl OrderService {
    /// Creates a new order service.
    pub fn new(
        orders: Arc<dyn OrderStore>,
        products: Arc<dyn ProductStore>,
        inventory: Arc<dyn InventoryStore>,
        users: Arc<dyn UserStore>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            orders,
            products,
            inventory,
            users,
            dispatcher,
        }
    }

    /// Places an order: assemble, reserve, persist, fan out.
    ///
    /// Assembly is read-only, so validation failures leave no side
    /// effects. Reservations run sequentially in cart order; if one fails
    /// the earlier ones are released before the error surfaces. After the
    /// order row commits, notification fan-out is best-effort per
    /// recipient — a dispatch failure never fails the placement.
    ///
    /// A retry after a dependency failure is NOT idempotent: the caller
    /// gets a fresh order and fresh reservations.
    pub async fn place_order(
        &self,
        ctx: &RequestContext,
        cart: &[CartItem],
        customer_info: CustomerInfo,
    ) -> AppResult<OrderDetails> {
        let assembled =
            assembler::assemble(self.products.as_ref(), self.inventory.as_ref(), cart).await?;

        self.reserve_all(&assembled.items).await?;

        let new_order = NewOrder {
            buyer_id: ctx.user_id,
            customer_info,
            items: assembled.items,
            total_amount: assembled.total_amount,
            status: OrderStatus::Confirmed,
            payment_status: PaymentStatus::Paid,
        };
        let (order, items) = match self.orders.create(&new_order).await {
            Ok(created) => created,
            Err(e) => {
                // The order row never landed; put the stock back.
                self.release(&new_order.items).await;
                return Err(e);
            }
        };

        self.refresh_stock_caches(&new_order.items).await;
        self.notify_sellers(ctx, &order, &new_order.items).await;
        self.notify_admins(ctx, &order, &new_order.items).await;

        self.populate(order, items).await
    }

    /// Moves an order to a new status.
    ///
    /// Authorized only for a seller owning at least one line item.
    /// Emits a status-update notification to the buyer.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> AppResult<OrderDetails> {
        let (order, items) = self
            .orders
            .find_by_id(order_id.into_uuid())
            .await?
            .ok_or_else(|| AppError::not_found("Order not found"))?;

        let is_seller = items.iter().any(|item| item.seller_id == ctx.user_id);
        if !is_seller {
            return Err(AppError::forbidden(
                "You are not authorized to update this order",
            ));
        }

        if !order.status.can_transition_to(new_status) {
            return Err(AppError::validation(format!(
                "Cannot move order from {} to {}",
                order.status, new_status
            )));
        }

        self.orders.update_status(order.id, new_status).await?;

        self.dispatcher
            .dispatch_logged(NewNotification {
                title: "Order Status Updated".to_string(),
                message: format!(
                    "Your order #{} has been updated to \"{new_status}\".",
                    order.id
                ),
                kind: NotificationKind::Orders,
                recipient: UserId::from_uuid(order.buyer_id),
                recipient_role: Some(UserRole::Buyer),
                product: None,
                sender: Some(UserId::from_uuid(ctx.user_id)),
                meta: Some(serde_json::json!({
                    "order_id": order.id,
                    "new_status": new_status,
                })),
            })
            .await;

        let updated = Order {
            status: new_status,
            ..order
        };
        self.populate(updated, items).await
    }

    /// Fetches one populated order. Readable by its buyer, any seller of
    /// record on it, or an admin.
    pub async fn get_order(&self, ctx: &RequestContext, order_id: OrderId) -> AppResult<OrderDetails> {
        let (order, items) = self
            .orders
            .find_by_id(order_id.into_uuid())
            .await?
            .ok_or_else(|| AppError::not_found("Order not found"))?;

        let is_buyer = order.buyer_id == ctx.user_id;
        let is_seller = items.iter().any(|item| item.seller_id == ctx.user_id);
        if !is_buyer && !is_seller && !ctx.is_admin() {
            return Err(AppError::forbidden("You may not view this order"));
        }

        self.populate(order, items).await
    }

    /// The caller's order history, newest first.
    pub async fn my_orders(&self, ctx: &RequestContext) -> AppResult<Vec<OrderDetails>> {
        let orders = self.orders.list_by_buyer(ctx.user_id).await?;
        let mut result = Vec::with_capacity(orders.len());
        for (order, items) in orders {
            result.push(self.populate(order, items).await?);
        }
        Ok(result)
    }

    /// Orders containing the caller's items, filtered to those items,
    /// with a per-seller subtotal.
    pub async fn seller_orders(&self, ctx: &RequestContext) -> AppResult<Vec<SellerOrderView>> {
        let orders = self.orders.list_by_seller(ctx.user_id).await?;
        let mut result = Vec::with_capacity(orders.len());
        for (order, items) in orders {
            let seller_items: Vec<OrderItem> = items
                .into_iter()
                .filter(|item| item.seller_id == ctx.user_id)
                .collect();
            let seller_total_amount: Decimal = seller_items
                .iter()
                .map(|item| item.price * Decimal::from(item.quantity))
                .sum();

            let details = self.populate(order, seller_items).await?;
            result.push(SellerOrderView {
                id: details.id,
                buyer: details.buyer,
                customer_info: details.customer_info,
                items: details.items,
                seller_total_amount,
                status: details.status,
                payment_status: details.payment_status,
                created_at: details.created_at,
            });
        }
        Ok(result)
    }

    /// Deletes an order. Buyer-owner or admin only.
    pub async fn delete_order(&self, ctx: &RequestContext, order_id: OrderId) -> AppResult<()> {
        let (order, _) = self
            .orders
            .find_by_id(order_id.into_uuid())
            .await?
            .ok_or_else(|| AppError::not_found("Order not found"))?;

        if order.buyer_id != ctx.user_id && !ctx.is_admin() {
            return Err(AppError::forbidden("You may not delete this order"));
        }

        self.orders.delete(order.id).await?;
        Ok(())
    }

    /// Reserve every line item in cart order. On failure, release the
    /// already-reserved prefix before returning the error.
    async fn reserve_all(&self, items: &[NewOrderItem]) -> AppResult<()> {
        for (index, item) in items.iter().enumerate() {
            let reserved = match self.inventory.reserve(item.product_id, item.quantity).await {
                Ok(reserved) => reserved,
                Err(e) => {
                    self.release(&items[..index]).await;
                    return Err(e);
                }
            };
            if !reserved {
                self.release(&items[..index]).await;
                return Err(AppError::insufficient_stock(format!(
                    "Insufficient stock for {}",
                    item.product_name
                )));
            }
        }
        Ok(())
    }

    /// Compensating release. Failures are logged, not propagated — the
    /// caller is already on an error path.
    async fn release(&self, items: &[NewOrderItem]) {
        for item in items {
            if let Err(e) = self.inventory.release(item.product_id, item.quantity).await {
                tracing::error!(
                    product_id = %item.product_id,
                    quantity = item.quantity,
                    error = %e,
                    "Failed to release reservation during compensation"
                );
            }
        }
    }

    /// Best-effort upkeep after reservations commit: refresh each
    /// product's denormalized stock cache and raise low-stock alerts to
    /// sellers whose products fell below their threshold.
    async fn refresh_stock_caches(&self, items: &[NewOrderItem]) {
        let mut seen: Vec<Uuid> = Vec::new();
        for item in items {
            if seen.contains(&item.product_id) {
                continue;
            }
            seen.push(item.product_id);

            let record = match self.inventory.find_by_product(item.product_id).await {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(
                        product_id = %item.product_id,
                        error = %e,
                        "Failed to read inventory for stock cache refresh"
                    );
                    continue;
                }
            };

            if let Err(e) = self
                .products
                .sync_stock(record.product_id, record.quantity_available)
                .await
            {
                tracing::warn!(
                    product_id = %record.product_id,
                    error = %e,
                    "Failed to refresh product stock cache"
                );
            }

            if record.is_below_minimum() {
                self.dispatcher
                    .dispatch_logged(NewNotification {
                        title: "Low Stock Alert".to_string(),
                        message: format!(
                            "\"{}\" is down to {} units.",
                            item.product_name, record.quantity_available
                        ),
                        kind: NotificationKind::Inventory,
                        recipient: UserId::from_uuid(item.seller_id),
                        recipient_role: Some(UserRole::Seller),
                        product: Some(ProductId::from_uuid(item.product_id)),
                        sender: None,
                        meta: Some(serde_json::json!({
                            "quantity_available": record.quantity_available,
                            "minimum_stock_alert": record.minimum_stock_alert,
                        })),
                    })
                    .await;
            }
        }
    }

    /// One "New Order Placed" notification per distinct seller, naming
    /// only that seller's purchased products.
    async fn notify_sellers(&self, ctx: &RequestContext, order: &Order, items: &[NewOrderItem]) {
        let mut by_seller: Vec<(Uuid, Vec<&NewOrderItem>)> = Vec::new();
        for item in items {
            match by_seller.iter_mut().find(|(seller, _)| *seller == item.seller_id) {
                Some((_, group)) => group.push(item),
                None => by_seller.push((item.seller_id, vec![item])),
            }
        }

        for (seller_id, group) in by_seller {
            let names: Vec<String> = group
                .iter()
                .map(|item| format!("\"{}\"", item.product_name))
                .collect();
            let message = if names.len() == 1 {
                format!("Your product {} has been purchased!", names[0])
            } else {
                format!("Your products {} have been purchased!", names.join(", "))
            };
            let product =
                (group.len() == 1).then(|| ProductId::from_uuid(group[0].product_id));

            self.dispatcher
                .dispatch_logged(NewNotification {
                    title: "New Order Placed".to_string(),
                    message,
                    kind: NotificationKind::Orders,
                    recipient: UserId::from_uuid(seller_id),
                    recipient_role: Some(UserRole::Seller),
                    product,
                    sender: Some(UserId::from_uuid(ctx.user_id)),
                    meta: Some(serde_json::json!({
                        "order_id": order.id,
                        "product_ids": group.iter().map(|i| i.product_id).collect::<Vec<_>>(),
                    })),
                })
                .await;
        }
    }

    /// One consolidated "New Order Placed" summary per admin recipient:
    /// buyer identity, the distinct sellers, and every product id.
    async fn notify_admins(&self, ctx: &RequestContext, order: &Order, items: &[NewOrderItem]) {
        let admins = match self.dispatcher.admin_recipients().await {
            Ok(admins) => admins,
            Err(e) => {
                tracing::error!(error = %e, "Failed to resolve admin recipients");
                return;
            }
        };
        if admins.is_empty() {
            return;
        }

        let mut seller_ids: Vec<Uuid> = Vec::new();
        for item in items {
            if !seller_ids.contains(&item.seller_id) {
                seller_ids.push(item.seller_id);
            }
        }
        let mut sellers = Vec::with_capacity(seller_ids.len());
        for seller_id in &seller_ids {
            match self.users.find_by_id(*seller_id).await {
                Ok(Some(user)) => sellers.push(serde_json::json!({
                    "seller_id": user.id,
                    "name": user.name,
                    "email": user.email,
                })),
                Ok(None) => sellers.push(serde_json::json!({ "seller_id": seller_id })),
                Err(e) => tracing::warn!(
                    seller_id = %seller_id,
                    error = %e,
                    "Failed to resolve seller for admin summary"
                ),
            }
        }

        let meta = serde_json::json!({
            "order_id": order.id,
            "buyer": {
                "id": ctx.user_id,
                "name": ctx.name,
                "email": ctx.email,
            },
            "sellers": sellers,
            "product_ids": items.iter().map(|i| i.product_id).collect::<Vec<_>>(),
        });

        for admin in admins {
            self.dispatcher
                .dispatch_logged(NewNotification {
                    title: "New Order Placed".to_string(),
                    message: format!("Order #{} placed by {}", order.id, ctx.name),
                    kind: NotificationKind::Orders,
                    recipient: UserId::from_uuid(admin.id),
                    recipient_role: Some(UserRole::Admin),
                    product: None,
                    sender: Some(UserId::from_uuid(ctx.user_id)),
                    meta: Some(meta.clone()),
                })
                .await;
        }
    }

    /// Resolve buyer, sellers, and product names into display fields.
    async fn populate(&self, order: Order, items: Vec<OrderItem>) -> AppResult<OrderDetails> {
        let buyer = self.user_summary(order.buyer_id).await;

        let mut product_names: HashMap<Uuid, String> = HashMap::new();
        let mut seller_summaries: HashMap<Uuid, UserSummary> = HashMap::new();
        let mut details = Vec::with_capacity(items.len());
        for item in items {
            let product_name = match product_names.get(&item.product_id) {
                Some(name) => name.clone(),
                None => {
                    let name = self
                        .products
                        .find_by_id(item.product_id)
                        .await?
                        .map(|product| product.name)
                        .unwrap_or_else(|| "unknown".to_string());
                    product_names.insert(item.product_id, name.clone());
                    name
                }
            };
            let seller = match seller_summaries.get(&item.seller_id) {
                Some(summary) => summary.clone(),
                None => {
                    let summary = self.user_summary(item.seller_id).await;
                    seller_summaries.insert(item.seller_id, summary.clone());
                    summary
                }
            };
            details.push(OrderItemDetails {
                product_id: item.product_id,
                product_name,
                quantity: item.quantity,
                price: item.price,
                seller,
            });
        }

        Ok(OrderDetails {
            id: order.id,
            buyer,
            customer_info: order.customer_info.0,
            items: details,
            total_amount: order.total_amount,
            status: order.status,
            payment_status: order.payment_status,
            created_at: order.created_at,
        })
    }

    async fn user_summary(&self, id: Uuid) -> UserSummary {
        match self.users.find_by_id(id).await {
            Ok(Some(user)) => UserSummary::from(&user),
            _ => UserSummary {
                id,
                name: "unknown".to_string(),
                email: String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use std::str::FromStr;
    use vendora_core::error::ErrorKind;
    use vendora_live::MemoryLiveStore;

    fn order_service(env: &TestEnv) -> Arc<OrderService> {
        let live = Arc::new(MemoryLiveStore::new());
        order_service_with(env, live, env.inventory.clone())
    }

    fn order_service_with(
        env: &TestEnv,
        live: Arc<MemoryLiveStore>,
        inventory: Arc<dyn InventoryStore>,
    ) -> Arc<OrderService> {
        let dispatcher = Arc::new(NotificationDispatcher::new(
            env.notifications.clone(),
            live,
            env.users.clone(),
        ));
        Arc::new(OrderService::new(
            env.orders.clone(),
            env.products.clone(),
            inventory,
            env.users.clone(),
            dispatcher,
        ))
    }

    #[tokio::test]
    async fn test_place_order_totals_and_snapshots() {
        let env = TestEnv::new();
        let s1 = env.add_user("Sara", UserRole::Seller);
        let s2 = env.add_user("Tom", UserRole::Seller);
        let buyer = env.add_user("Alex", UserRole::Buyer);
        let a = env.add_product("Product A", "10.00", s1.id);
        let b = env.add_product("Product B", "5.00", s2.id);
        env.add_inventory(a.id, 5, None);
        env.add_inventory(b.id, 5, None);
        let service = order_service(&env);

        let cart = vec![
            CartItem { product_id: a.id, quantity: 2 },
            CartItem { product_id: b.id, quantity: 1 },
        ];
        let order = service
            .place_order(&ctx_for(buyer.id, UserRole::Buyer), &cart, customer_info())
            .await
            .unwrap();

        assert_eq!(order.total_amount, Decimal::from_str("25.00").unwrap());
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.items[0].seller.id, s1.id);
        assert_eq!(order.items[1].seller.id, s2.id);

        // Inventory deducted, product stock cache refreshed.
        assert_eq!(env.inventory.quantity(a.id), 3);
        assert_eq!(env.inventory.quantity(b.id), 4);
        assert_eq!(env.products.get(a.id).stock, 3);

        // Later price changes never touch the snapshot.
        env.products.set_price(a.id, "99.00");
        let reread = service
            .get_order(
                &ctx_for(buyer.id, UserRole::Buyer),
                OrderId::from_uuid(order.id),
            )
            .await
            .unwrap();
        assert_eq!(reread.total_amount, Decimal::from_str("25.00").unwrap());
        assert_eq!(reread.items[0].price, Decimal::from_str("10.00").unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_last_unit_exactly_one_wins() {
        let env = TestEnv::new();
        let seller = env.add_user("Sara", UserRole::Seller);
        let b1 = env.add_user("Alex", UserRole::Buyer);
        let b2 = env.add_user("Blake", UserRole::Buyer);
        let p = env.add_product("Last One", "10.00", seller.id);
        env.add_inventory(p.id, 1, None);
        let service = order_service(&env);

        let cart = vec![CartItem { product_id: p.id, quantity: 1 }];
        let ctx1 = ctx_for(b1.id, UserRole::Buyer);
        let ctx2 = ctx_for(b2.id, UserRole::Buyer);
        let (r1, r2) = tokio::join!(
            service.place_order(&ctx1, &cart, customer_info()),
            service.place_order(&ctx2, &cart, customer_info()),
        );

        let outcomes = [r1, r2];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        let loser = outcomes
            .iter()
            .find_map(|r| r.as_ref().err())
            .expect("one attempt must lose");
        assert_eq!(loser.kind, ErrorKind::InsufficientStock);

        assert_eq!(env.inventory.quantity(p.id), 0);
        assert_eq!(env.orders.count(), 1);
    }

    #[tokio::test]
    async fn test_fan_out_per_seller_and_admin_summary() {
        let env = TestEnv::new();
        let admin = env.add_user("Ada", UserRole::Admin);
        let s1 = env.add_user("Sara", UserRole::Seller);
        let s2 = env.add_user("Tom", UserRole::Seller);
        let buyer = env.add_user("Alex", UserRole::Buyer);
        let a = env.add_product("Blue Mug", "10.00", s1.id);
        let b = env.add_product("Red Cap", "5.00", s2.id);
        env.add_inventory(a.id, 5, None);
        env.add_inventory(b.id, 5, None);
        let service = order_service(&env);

        let cart = vec![
            CartItem { product_id: a.id, quantity: 1 },
            CartItem { product_id: b.id, quantity: 1 },
        ];
        service
            .place_order(&ctx_for(buyer.id, UserRole::Buyer), &cart, customer_info())
            .await
            .unwrap();

        let all = env.notifications.all();

        // Exactly one notification per seller, naming only their product.
        let to_s1: Vec<_> = all.iter().filter(|n| n.recipient_id == s1.id).collect();
        assert_eq!(to_s1.len(), 1);
        assert!(to_s1[0].message.contains("Blue Mug"));
        assert!(!to_s1[0].message.contains("Red Cap"));

        let to_s2: Vec<_> = all.iter().filter(|n| n.recipient_id == s2.id).collect();
        assert_eq!(to_s2.len(), 1);
        assert!(to_s2[0].message.contains("Red Cap"));
        assert!(!to_s2[0].message.contains("Blue Mug"));

        // One consolidated admin summary listing both sellers.
        let to_admin: Vec<_> = all.iter().filter(|n| n.recipient_id == admin.id).collect();
        assert_eq!(to_admin.len(), 1);
        let meta = to_admin[0].meta.as_ref().unwrap();
        assert_eq!(meta["sellers"].as_array().unwrap().len(), 2);
        assert_eq!(meta["product_ids"].as_array().unwrap().len(), 2);
        assert_eq!(meta["buyer"]["id"].as_str().unwrap(), buyer.id.to_string());

        // Every dispatched notification got mirrored and cross-linked.
        for n in &all {
            assert!(n.live_id.is_some());
        }
    }

    #[tokio::test]
    async fn test_one_notification_per_seller_with_two_products() {
        let env = TestEnv::new();
        let seller = env.add_user("Sara", UserRole::Seller);
        let buyer = env.add_user("Alex", UserRole::Buyer);
        let a = env.add_product("Blue Mug", "10.00", seller.id);
        let b = env.add_product("Green Mug", "12.00", seller.id);
        env.add_inventory(a.id, 5, None);
        env.add_inventory(b.id, 5, None);
        let service = order_service(&env);

        let cart = vec![
            CartItem { product_id: a.id, quantity: 1 },
            CartItem { product_id: b.id, quantity: 1 },
        ];
        service
            .place_order(&ctx_for(buyer.id, UserRole::Buyer), &cart, customer_info())
            .await
            .unwrap();

        let to_seller: Vec<_> = env
            .notifications
            .all()
            .into_iter()
            .filter(|n| n.recipient_id == seller.id)
            .collect();
        assert_eq!(to_seller.len(), 1);
        assert!(to_seller[0].message.contains("Blue Mug"));
        assert!(to_seller[0].message.contains("Green Mug"));
    }

    #[tokio::test]
    async fn test_mid_cart_reservation_failure_compensates() {
        let env = TestEnv::new();
        let seller = env.add_user("Sara", UserRole::Seller);
        let buyer = env.add_user("Alex", UserRole::Buyer);
        let a = env.add_product("Product A", "10.00", seller.id);
        let b = env.add_product("Product B", "5.00", seller.id);
        env.add_inventory(a.id, 5, None);
        env.add_inventory(b.id, 5, None);

        // B reads as in stock but its reservation loses the race.
        let inventory = Arc::new(DepletedOnReserve {
            inner: env.inventory.clone(),
            fail_product: b.id,
        });
        let live = Arc::new(MemoryLiveStore::new());
        let service = order_service_with(&env, live, inventory);

        let cart = vec![
            CartItem { product_id: a.id, quantity: 2 },
            CartItem { product_id: b.id, quantity: 1 },
        ];
        let err = service
            .place_order(&ctx_for(buyer.id, UserRole::Buyer), &cart, customer_info())
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::InsufficientStock);
        // A's reservation was released; nothing was persisted or sent.
        assert_eq!(env.inventory.quantity(a.id), 5);
        assert_eq!(env.orders.count(), 0);
        assert!(env.notifications.all().is_empty());
    }

    #[tokio::test]
    async fn test_low_stock_alert_after_reservation() {
        let env = TestEnv::new();
        let seller = env.add_user("Sara", UserRole::Seller);
        let buyer = env.add_user("Alex", UserRole::Buyer);
        let p = env.add_product("Blue Mug", "10.00", seller.id);
        env.add_inventory(p.id, 3, Some(3));
        let service = order_service(&env);

        let cart = vec![CartItem { product_id: p.id, quantity: 1 }];
        service
            .place_order(&ctx_for(buyer.id, UserRole::Buyer), &cart, customer_info())
            .await
            .unwrap();

        let alerts: Vec<_> = env
            .notifications
            .all()
            .into_iter()
            .filter(|n| n.kind == NotificationKind::Inventory)
            .collect();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].recipient_id, seller.id);
        assert!(alerts[0].message.contains("2 units"));
    }

    #[tokio::test]
    async fn test_update_status_by_owning_seller_notifies_buyer() {
        let env = TestEnv::new();
        let seller = env.add_user("Sara", UserRole::Seller);
        let buyer = env.add_user("Alex", UserRole::Buyer);
        let p = env.add_product("Blue Mug", "10.00", seller.id);
        env.add_inventory(p.id, 5, None);
        let service = order_service(&env);

        let cart = vec![CartItem { product_id: p.id, quantity: 1 }];
        let order = service
            .place_order(&ctx_for(buyer.id, UserRole::Buyer), &cart, customer_info())
            .await
            .unwrap();

        let updated = service
            .update_status(
                &ctx_for(seller.id, UserRole::Seller),
                OrderId::from_uuid(order.id),
                OrderStatus::Shipped,
            )
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Shipped);

        let to_buyer: Vec<_> = env
            .notifications
            .all()
            .into_iter()
            .filter(|n| n.recipient_id == buyer.id)
            .collect();
        assert_eq!(to_buyer.len(), 1);
        assert!(to_buyer[0].message.contains("shipped"));
    }

    #[tokio::test]
    async fn test_update_status_rejects_non_seller_and_bad_transition() {
        let env = TestEnv::new();
        let seller = env.add_user("Sara", UserRole::Seller);
        let buyer = env.add_user("Alex", UserRole::Buyer);
        let p = env.add_product("Blue Mug", "10.00", seller.id);
        env.add_inventory(p.id, 5, None);
        let service = order_service(&env);

        let cart = vec![CartItem { product_id: p.id, quantity: 1 }];
        let order = service
            .place_order(&ctx_for(buyer.id, UserRole::Buyer), &cart, customer_info())
            .await
            .unwrap();
        let order_id = OrderId::from_uuid(order.id);

        // The buyer is not a seller of record.
        let err = service
            .update_status(&ctx_for(buyer.id, UserRole::Buyer), order_id, OrderStatus::Shipped)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        // Confirmed cannot jump straight to delivered.
        let err = service
            .update_status(
                &ctx_for(seller.id, UserRole::Seller),
                order_id,
                OrderStatus::Delivered,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = service
            .update_status(
                &ctx_for(seller.id, UserRole::Seller),
                OrderId::new(),
                OrderStatus::Shipped,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_seller_orders_filters_items_and_totals() {
        let env = TestEnv::new();
        let s1 = env.add_user("Sara", UserRole::Seller);
        let s2 = env.add_user("Tom", UserRole::Seller);
        let buyer = env.add_user("Alex", UserRole::Buyer);
        let a = env.add_product("Blue Mug", "10.00", s1.id);
        let b = env.add_product("Red Cap", "5.00", s2.id);
        env.add_inventory(a.id, 5, None);
        env.add_inventory(b.id, 5, None);
        let service = order_service(&env);

        let cart = vec![
            CartItem { product_id: a.id, quantity: 2 },
            CartItem { product_id: b.id, quantity: 3 },
        ];
        service
            .place_order(&ctx_for(buyer.id, UserRole::Buyer), &cart, customer_info())
            .await
            .unwrap();

        let views = service
            .seller_orders(&ctx_for(s1.id, UserRole::Seller))
            .await
            .unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].items.len(), 1);
        assert_eq!(views[0].items[0].product_name, "Blue Mug");
        assert_eq!(
            views[0].seller_total_amount,
            Decimal::from_str("20.00").unwrap()
        );
    }

    #[tokio::test]
    async fn test_delete_order_authorization() {
        let env = TestEnv::new();
        let seller = env.add_user("Sara", UserRole::Seller);
        let buyer = env.add_user("Alex", UserRole::Buyer);
        let p = env.add_product("Blue Mug", "10.00", seller.id);
        env.add_inventory(p.id, 5, None);
        let service = order_service(&env);

        let cart = vec![CartItem { product_id: p.id, quantity: 1 }];
        let order = service
            .place_order(&ctx_for(buyer.id, UserRole::Buyer), &cart, customer_info())
            .await
            .unwrap();
        let order_id = OrderId::from_uuid(order.id);

        let err = service
            .delete_order(&ctx_for(Uuid::new_v4(), UserRole::Buyer), order_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        service
            .delete_order(&ctx_for(buyer.id, UserRole::Buyer), order_id)
            .await
            .unwrap();
        assert_eq!(env.orders.count(), 0);
    }
}
