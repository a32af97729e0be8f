//! Application state shared across all handlers.

use std::sync::Arc;

use vendora_core::config::AppConfig;
use vendora_database::DatabasePool;
use vendora_live::LiveStoreManager;
use vendora_service::inventory::InventoryService;
use vendora_service::notification::NotificationService;
use vendora_service::order::OrderService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool (health checks).
    pub db: DatabasePool,
    /// Live-update store (health checks).
    pub live: Arc<LiveStoreManager>,
    /// Order placement and projections.
    pub order_service: Arc<OrderService>,
    /// Inventory ledger operations.
    pub inventory_service: Arc<InventoryService>,
    /// Notification read/ack subsystem.
    pub notification_service: Arc<NotificationService>,
}
