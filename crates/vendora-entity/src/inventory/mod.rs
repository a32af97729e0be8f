//! Inventory ledger entity.

pub mod model;

pub use model::{InventoryRecord, InventoryUpsert};
