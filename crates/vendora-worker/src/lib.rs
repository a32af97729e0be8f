//! # vendora-worker
//!
//! Background maintenance for the dual-store notification pipeline: a
//! reconciliation sweep that re-mirrors primary records whose live-store
//! write failed, and a retention sweep that deletes old notifications
//! from both stores.

pub mod jobs;
pub mod runner;

pub use runner::{Sweep, SweepRunner};
