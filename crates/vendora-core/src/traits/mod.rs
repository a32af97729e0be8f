//! Core traits defined in `vendora-core` and implemented by other crates.

pub mod live;

pub use live::{LiveStore, LiveWrite};
