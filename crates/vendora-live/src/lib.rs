//! # vendora-live
//!
//! Providers for the secondary live-update store: a Redis backend that
//! publishes every document write for connected clients, and an in-memory
//! backend for development and tests. Both implement
//! [`vendora_core::traits::LiveStore`].

pub mod document;
pub mod memory;
pub mod provider;
pub mod redis;

pub use memory::MemoryLiveStore;
pub use provider::LiveStoreManager;
pub use redis::RedisLiveStore;
