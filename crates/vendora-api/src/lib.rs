//! # vendora-api
//!
//! HTTP API layer for Vendora: Axum routes, handlers, the `AuthUser`
//! extractor, request/response DTOs, and the `AppError` → HTTP mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;
