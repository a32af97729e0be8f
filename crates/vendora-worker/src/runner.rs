//! Sweep runner — periodic loop that executes registered sweeps until
//! shutdown.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;
use tokio::time;

use vendora_core::config::worker::WorkerConfig;
use vendora_core::result::AppResult;

/// Trait for periodic maintenance sweeps.
#[async_trait]
pub trait Sweep: Send + Sync + std::fmt::Debug {
    /// Short sweep name for logging.
    fn name(&self) -> &str;

    /// Run one pass; returns a JSON summary for the log line.
    async fn run(&self) -> AppResult<Value>;
}

/// Runs every registered sweep on a fixed interval.
#[derive(Debug)]
pub struct SweepRunner {
    /// Registered sweeps, executed in registration order.
    sweeps: Vec<Arc<dyn Sweep>>,
    /// Worker configuration.
    config: WorkerConfig,
}

impl SweepRunner {
    /// Create an empty runner.
    pub fn new(config: WorkerConfig) -> Self {
        Self {
            sweeps: Vec::new(),
            config,
        }
    }

    /// Register a sweep.
    pub fn register(&mut self, sweep: Arc<dyn Sweep>) {
        tracing::info!("Registered sweep '{}'", sweep.name());
        self.sweeps.push(sweep);
    }

    /// Run until the cancel signal flips to `true`. One failing sweep is
    /// logged and never stops the others.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            interval_seconds = self.config.sweep_interval_seconds,
            sweeps = self.sweeps.len(),
            "Worker started"
        );

        let interval = Duration::from_secs(self.config.sweep_interval_seconds);

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        break;
                    }
                }
                _ = time::sleep(interval) => {
                    self.run_once().await;
                }
            }
        }

        tracing::info!("Worker shut down");
    }

    /// Execute every registered sweep once.
    pub async fn run_once(&self) {
        for sweep in &self.sweeps {
            match sweep.run().await {
                Ok(summary) => {
                    tracing::debug!(sweep = sweep.name(), %summary, "Sweep completed");
                }
                Err(e) => {
                    tracing::error!(sweep = sweep.name(), error = %e, "Sweep failed");
                }
            }
        }
    }
}
