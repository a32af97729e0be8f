//! Inventory ledger operations.

pub mod service;

pub use service::InventoryService;
