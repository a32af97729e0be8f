//! # vendora-core
//!
//! Core crate for the Vendora marketplace backend. Contains the unified
//! error system, configuration schemas, typed identifiers, pagination
//! types, and the `LiveStore` trait for the secondary live-update store.
//!
//! This crate has **no** internal dependencies on other Vendora crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
