//! # vendora-entity
//!
//! Domain entity models for the Vendora marketplace. Every struct in this
//! crate represents a database table row or a domain value object. All
//! entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and
//! database entities additionally derive `sqlx::FromRow`.

pub mod inventory;
pub mod notification;
pub mod order;
pub mod product;
pub mod user;
