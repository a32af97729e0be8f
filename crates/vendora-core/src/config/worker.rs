//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background sweep worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Interval in seconds between sweep runs.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
    /// Age in seconds before an unmirrored notification is considered
    /// stuck and picked up by the reconciliation sweep.
    #[serde(default = "default_reconcile_grace")]
    pub reconcile_grace_seconds: u64,
    /// Maximum notifications re-mirrored per reconciliation sweep.
    #[serde(default = "default_reconcile_batch")]
    pub reconcile_batch_size: i64,
    /// Age in days after which notifications are deleted.
    #[serde(default = "default_retention_days")]
    pub notification_retention_days: i64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            sweep_interval_seconds: default_sweep_interval(),
            reconcile_grace_seconds: default_reconcile_grace(),
            reconcile_batch_size: default_reconcile_batch(),
            notification_retention_days: default_retention_days(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_reconcile_grace() -> u64 {
    120
}

fn default_reconcile_batch() -> i64 {
    100
}

fn default_retention_days() -> i64 {
    90
}
