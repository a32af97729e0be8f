//! Order assembly and placement.

pub mod assembler;
pub mod service;

pub use assembler::{AssembledOrder, CartItem, assemble};
pub use service::OrderService;
