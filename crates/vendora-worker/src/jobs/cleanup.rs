//! Notification retention cleanup sweep.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;

use vendora_core::result::AppResult;
use vendora_core::traits::LiveStore;
use vendora_database::stores::NotificationStore;
use vendora_service::notification::NOTIFICATIONS_COLLECTION;

use crate::runner::Sweep;

/// Deletes notifications older than the retention window from both
/// stores: primary rows first (they return the mirror ids), then each
/// mirror document.
#[derive(Debug)]
pub struct NotificationCleanupSweep {
    /// Primary-store notification records.
    notifications: Arc<dyn NotificationStore>,
    /// Secondary live-update store.
    live: Arc<dyn LiveStore>,
    /// Max age in days before cleanup.
    retention_days: i64,
}

impl NotificationCleanupSweep {
    /// Create a new cleanup sweep.
    pub fn new(
        notifications: Arc<dyn NotificationStore>,
        live: Arc<dyn LiveStore>,
        retention_days: i64,
    ) -> Self {
        Self {
            notifications,
            live,
            retention_days,
        }
    }
}

#[async_trait]
impl Sweep for NotificationCleanupSweep {
    fn name(&self) -> &str {
        "notification_cleanup"
    }

    async fn run(&self) -> AppResult<Value> {
        let cutoff = Utc::now() - Duration::days(self.retention_days);
        let removed = self.notifications.delete_older_than(cutoff).await?;

        let mut mirrors_removed = 0u64;
        for notification in &removed {
            if let Some(live_id) = &notification.live_id {
                match self
                    .live
                    .delete_document(NOTIFICATIONS_COLLECTION, live_id)
                    .await
                {
                    Ok(()) => mirrors_removed += 1,
                    Err(e) => tracing::warn!(
                        id = %notification.id,
                        live_id = %live_id,
                        error = %e,
                        "Failed to delete mirror document"
                    ),
                }
            }
        }

        Ok(serde_json::json!({
            "task": "notification_cleanup",
            "removed": removed.len(),
            "mirrors_removed": mirrors_removed,
            "cutoff_days": self.retention_days,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::testutil::{VecNotifications, aged_notification};
    use uuid::Uuid;
    use vendora_live::MemoryLiveStore;

    #[tokio::test]
    async fn test_removes_old_rows_and_their_mirrors() {
        let notifications = Arc::new(VecNotifications::default());
        let live = Arc::new(MemoryLiveStore::new());

        // Old mirrored record.
        let mut old = aged_notification(Uuid::new_v4(), 91 * 24 * 3600);
        let live_id = live
            .add_document(NOTIFICATIONS_COLLECTION, &old.mirror_document())
            .await
            .unwrap();
        old.live_id = Some(live_id.clone());
        notifications.create(&old).await.unwrap();

        // Recent record stays.
        let recent = aged_notification(Uuid::new_v4(), 3600);
        notifications.create(&recent).await.unwrap();

        let sweep = NotificationCleanupSweep::new(notifications.clone(), live.clone(), 90);
        let summary = sweep.run().await.unwrap();

        assert_eq!(summary["removed"], serde_json::json!(1));
        assert_eq!(summary["mirrors_removed"], serde_json::json!(1));
        let remaining = notifications.all();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, recent.id);
        assert!(
            live.get_document(NOTIFICATIONS_COLLECTION, &live_id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
