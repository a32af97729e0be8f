//! # vendora-database
//!
//! PostgreSQL connection management, the store traits consumed by the
//! service layer, and their concrete sqlx repository implementations.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod stores;

pub use connection::DatabasePool;
pub use stores::{InventoryStore, NotificationStore, OrderStore, ProductStore, UserStore};
