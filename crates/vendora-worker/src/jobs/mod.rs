//! Sweep implementations.

pub mod cleanup;
pub mod reconcile;

pub use cleanup::NotificationCleanupSweep;
pub use reconcile::MirrorReconcileSweep;
