//! Notification dispatcher — writes each notification into both stores
//! and links their identifiers.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use vendora_core::result::AppResult;
use vendora_core::traits::LiveStore;
use vendora_database::stores::{NotificationStore, UserStore};
use vendora_entity::notification::{NewNotification, Notification};
use vendora_entity::user::{User, UserRole};

/// Live-store collection holding notification mirror documents.
pub const NOTIFICATIONS_COLLECTION: &str = "notifications";

/// Dispatches notifications into the primary store and mirrors them into
/// the live-update store.
///
/// The primary write is durable before the mirror is attempted; if the
/// mirror or the cross-link patch fails, the primary record still exists
/// and the error surfaces to the caller. There is no rollback — the
/// reconciliation sweep re-mirrors stragglers later.
#[derive(Debug)]
pub struct NotificationDispatcher {
    /// Primary-store notification records.
    notifications: Arc<dyn NotificationStore>,
    /// Secondary live-update store.
    live: Arc<dyn LiveStore>,
    /// Account lookups for role-based recipient resolution.
    users: Arc<dyn UserStore>,
}

impl NotificationDispatcher {
    /// Create a new dispatcher.
    pub fn new(
        notifications: Arc<dyn NotificationStore>,
        live: Arc<dyn LiveStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            notifications,
            live,
            users,
        }
    }

    /// Dispatch one notification to both stores.
    ///
    /// 1. Insert the primary record with `seen = false`.
    /// 2. Add the mirror document (same payload plus `primary_id`; the
    ///    live store assigns the document id and timestamp).
    /// 3. Patch the primary record with the assigned `live_id`.
    pub async fn dispatch(&self, input: NewNotification) -> AppResult<Notification> {
        let mut notification = Notification {
            id: Uuid::new_v4(),
            title: input.title,
            message: input.message,
            kind: input.kind,
            product_id: input.product.map(|p| p.into_uuid()),
            sender_id: input.sender.map(|s| s.into_uuid()),
            recipient_id: input.recipient.into_uuid(),
            recipient_role: input.recipient_role,
            seen: false,
            meta: input.meta,
            created_at: Utc::now(),
            live_id: None,
        };

        self.notifications.create(&notification).await?;

        let live_id = self
            .live
            .add_document(NOTIFICATIONS_COLLECTION, &notification.mirror_document())
            .await?;
        self.notifications
            .set_live_id(notification.id, &live_id)
            .await?;

        notification.live_id = Some(live_id);
        Ok(notification)
    }

    /// Fan-out variant of [`dispatch`](Self::dispatch): one recipient's
    /// failure must never abort delivery to the others, so errors are
    /// logged and swallowed here.
    pub async fn dispatch_logged(&self, input: NewNotification) {
        let recipient = input.recipient;
        if let Err(e) = self.dispatch(input).await {
            tracing::error!(
                recipient = %recipient,
                error = %e,
                "Failed to dispatch notification"
            );
        }
    }

    /// Resolve the admin recipients for a consolidated dispatch.
    ///
    /// Resolved fresh on every call; zero or multiple admins are both
    /// valid outcomes.
    pub async fn admin_recipients(&self) -> AppResult<Vec<User>> {
        self.users.find_by_role(UserRole::Admin).await
    }

    /// Mirror a primary record whose earlier mirror write failed, and
    /// cross-link it. Used by the reconciliation sweep.
    pub async fn remirror(&self, notification: &Notification) -> AppResult<String> {
        let live_id = self
            .live
            .add_document(NOTIFICATIONS_COLLECTION, &notification.mirror_document())
            .await?;
        self.notifications
            .set_live_id(notification.id, &live_id)
            .await?;
        Ok(live_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use vendora_core::types::id::UserId;
    use vendora_entity::notification::NotificationKind;
    use vendora_live::MemoryLiveStore;

    fn dispatcher(
        env: &TestEnv,
    ) -> (NotificationDispatcher, Arc<MemoryLiveStore>) {
        let live = Arc::new(MemoryLiveStore::new());
        let dispatcher = NotificationDispatcher::new(
            env.notifications.clone(),
            live.clone(),
            env.users.clone(),
        );
        (dispatcher, live)
    }

    fn new_notification(recipient: Uuid) -> NewNotification {
        NewNotification {
            title: "New Order Placed".to_string(),
            message: "Your product \"Blue Mug\" has been purchased!".to_string(),
            kind: NotificationKind::Orders,
            recipient: UserId::from_uuid(recipient),
            recipient_role: None,
            product: None,
            sender: None,
            meta: None,
        }
    }

    #[tokio::test]
    async fn test_dispatch_cross_references_both_stores() {
        let env = TestEnv::new();
        let (dispatcher, live) = dispatcher(&env);

        let recipient = Uuid::new_v4();
        let sent = dispatcher.dispatch(new_notification(recipient)).await.unwrap();

        // Primary row carries the mirror id.
        let live_id = sent.live_id.clone().expect("live id should be set");
        let stored = env.notifications.find_by_id(sent.id).await.unwrap().unwrap();
        assert_eq!(stored.live_id.as_deref(), Some(live_id.as_str()));
        assert!(!stored.seen);

        // Mirror document points back at the primary row.
        let doc = live
            .get_document(NOTIFICATIONS_COLLECTION, &live_id)
            .await
            .unwrap()
            .expect("mirror document should exist");
        assert_eq!(doc["primary_id"].as_str().unwrap(), sent.id.to_string());
        assert_eq!(doc["seen"], serde_json::json!(false));
        assert!(doc["created_at"].is_string());
    }

    #[tokio::test]
    async fn test_dispatch_logged_swallows_mirror_failure() {
        let env = TestEnv::new();
        let live = Arc::new(FailingLiveStore);
        let dispatcher =
            NotificationDispatcher::new(env.notifications.clone(), live, env.users.clone());

        let recipient = Uuid::new_v4();
        dispatcher.dispatch_logged(new_notification(recipient)).await;

        // The primary record survives the mirror failure, unmirrored.
        let rows = env.notifications.all();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].live_id.is_none());
    }
}
