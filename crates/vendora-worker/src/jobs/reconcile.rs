//! Mirror reconciliation sweep.
//!
//! Dispatch guarantees the primary write; the mirror write is
//! best-effort. This sweep finds primary records that never received a
//! `live_id` and re-mirrors them, restoring the cross-store invariant.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;

use vendora_core::result::AppResult;
use vendora_database::stores::NotificationStore;
use vendora_service::notification::NotificationDispatcher;

use crate::runner::Sweep;

/// Re-mirrors notifications whose live-store write previously failed.
#[derive(Debug)]
pub struct MirrorReconcileSweep {
    /// Primary-store notification records.
    notifications: Arc<dyn NotificationStore>,
    /// Dispatcher used to mirror and cross-link.
    dispatcher: Arc<NotificationDispatcher>,
    /// Minimum age in seconds before a record counts as stuck, so the
    /// sweep never races an in-flight dispatch.
    grace_seconds: i64,
    /// Per-sweep cap.
    batch_size: i64,
}

impl MirrorReconcileSweep {
    /// Create a new reconciliation sweep.
    pub fn new(
        notifications: Arc<dyn NotificationStore>,
        dispatcher: Arc<NotificationDispatcher>,
        grace_seconds: i64,
        batch_size: i64,
    ) -> Self {
        Self {
            notifications,
            dispatcher,
            grace_seconds,
            batch_size,
        }
    }
}

#[async_trait]
impl Sweep for MirrorReconcileSweep {
    fn name(&self) -> &str {
        "mirror_reconcile"
    }

    async fn run(&self) -> AppResult<Value> {
        let older_than = Utc::now() - Duration::seconds(self.grace_seconds);
        let stragglers = self
            .notifications
            .find_unmirrored(older_than, self.batch_size)
            .await?;

        let mut mirrored = 0u64;
        let mut failed = 0u64;
        for notification in &stragglers {
            match self.dispatcher.remirror(notification).await {
                Ok(live_id) => {
                    mirrored += 1;
                    tracing::info!(
                        id = %notification.id,
                        live_id = %live_id,
                        "Re-mirrored notification"
                    );
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!(
                        id = %notification.id,
                        error = %e,
                        "Failed to re-mirror notification"
                    );
                }
            }
        }

        Ok(serde_json::json!({
            "task": "mirror_reconcile",
            "scanned": stragglers.len(),
            "mirrored": mirrored,
            "failed": failed,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::testutil::{NoUsers, VecNotifications, aged_notification};
    use uuid::Uuid;
    use vendora_core::traits::LiveStore;
    use vendora_live::MemoryLiveStore;
    use vendora_service::notification::NOTIFICATIONS_COLLECTION;

    #[tokio::test]
    async fn test_remirrors_stuck_records_only() {
        let notifications = Arc::new(VecNotifications::default());
        let live = Arc::new(MemoryLiveStore::new());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            notifications.clone(),
            live.clone(),
            Arc::new(NoUsers),
        ));

        // One stuck record past the grace period, one fresh record that
        // an in-flight dispatch may still be mirroring.
        let stuck = aged_notification(Uuid::new_v4(), 600);
        let fresh = aged_notification(Uuid::new_v4(), 5);
        notifications.create(&stuck).await.unwrap();
        notifications.create(&fresh).await.unwrap();

        let sweep = MirrorReconcileSweep::new(notifications.clone(), dispatcher, 120, 100);
        let summary = sweep.run().await.unwrap();
        assert_eq!(summary["mirrored"], serde_json::json!(1));

        let rows = notifications.all();
        let stuck_row = rows.iter().find(|n| n.id == stuck.id).unwrap();
        let live_id = stuck_row.live_id.clone().expect("stuck record re-mirrored");
        let doc = live
            .get_document(NOTIFICATIONS_COLLECTION, &live_id)
            .await
            .unwrap()
            .expect("mirror document exists");
        assert_eq!(doc["primary_id"].as_str().unwrap(), stuck.id.to_string());

        let fresh_row = rows.iter().find(|n| n.id == fresh.id).unwrap();
        assert!(fresh_row.live_id.is_none());
    }
}
