//! Notification read/ack subsystem: list, mark-read, mark-all-read,
//! delete — each keeping the primary and live stores in sync.

use std::sync::Arc;

use vendora_core::error::AppError;
use vendora_core::result::AppResult;
use vendora_core::traits::{LiveStore, LiveWrite};
use vendora_core::types::pagination::{PageRequest, PageResponse};
use vendora_database::stores::NotificationStore;
use vendora_entity::notification::{Notification, NotificationRef};
use vendora_entity::user::UserRole;

use crate::context::RequestContext;

use super::dispatcher::NOTIFICATIONS_COLLECTION;

/// Manages reading and acknowledging notifications across both stores.
#[derive(Debug)]
pub struct NotificationService {
    /// Primary-store notification records.
    notifications: Arc<dyn NotificationStore>,
    /// Secondary live-update store.
    live: Arc<dyn LiveStore>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notifications: Arc<dyn NotificationStore>, live: Arc<dyn LiveStore>) -> Self {
        Self {
            notifications,
            live,
        }
    }

    /// Lists notifications for the current user, newest first.
    ///
    /// Admins see the shared admin feed (everything addressed to the
    /// admin role); everyone else sees only notifications addressed to
    /// their own id.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        if ctx.is_admin() {
            self.notifications
                .list_for_role(UserRole::Admin, &page)
                .await
        } else {
            self.notifications
                .list_for_recipient(ctx.user_id, &page)
                .await
        }
    }

    /// Marks one notification as read in both stores.
    ///
    /// The identifier may be either store's native id. Only the recipient
    /// or an admin may acknowledge it. When the record was never mirrored
    /// only the primary store is updated — that is not an error.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        reference: &NotificationRef,
    ) -> AppResult<Notification> {
        let notification = self.resolve_authorized(ctx, reference).await?;

        self.notifications.mark_seen(notification.id).await?;
        if let Some(live_id) = &notification.live_id {
            self.live
                .update_document(
                    NOTIFICATIONS_COLLECTION,
                    live_id,
                    &serde_json::json!({ "seen": true }),
                )
                .await?;
        }

        Ok(Notification {
            seen: true,
            ..notification
        })
    }

    /// Marks all of the current user's notifications as read.
    ///
    /// Bulk-updates the unseen primary rows, then patches their mirrors
    /// as one batched live-store write. Calling this twice is a no-op the
    /// second time. Returns how many records were updated.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        let updated = self.notifications.mark_all_seen(ctx.user_id).await?;

        let writes: Vec<LiveWrite> = updated
            .iter()
            .filter_map(|n| n.live_id.as_ref())
            .map(|live_id| LiveWrite {
                id: live_id.clone(),
                patch: serde_json::json!({ "seen": true }),
            })
            .collect();
        if !writes.is_empty() {
            self.live
                .apply_batch(NOTIFICATIONS_COLLECTION, &writes)
                .await?;
        }

        Ok(updated.len() as u64)
    }

    /// Deletes a notification from both stores: mirror first (when one
    /// exists), then the primary record.
    pub async fn delete(&self, ctx: &RequestContext, reference: &NotificationRef) -> AppResult<()> {
        let notification = self.resolve_authorized(ctx, reference).await?;

        if let Some(live_id) = &notification.live_id {
            self.live
                .delete_document(NOTIFICATIONS_COLLECTION, live_id)
                .await?;
        }
        self.notifications.delete(notification.id).await?;

        Ok(())
    }

    /// Resolves a dual-store reference and checks that the caller may act
    /// on the record.
    async fn resolve_authorized(
        &self,
        ctx: &RequestContext,
        reference: &NotificationRef,
    ) -> AppResult<Notification> {
        let notification = self
            .notifications
            .find_by_ref(reference)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))?;

        if notification.recipient_id != ctx.user_id && !ctx.is_admin() {
            return Err(AppError::forbidden(
                "Only the recipient or an admin may modify this notification",
            ));
        }

        Ok(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use vendora_core::error::ErrorKind;
    use vendora_entity::user::UserRole;
    use vendora_live::MemoryLiveStore;

    struct Setup {
        env: TestEnv,
        live: Arc<MemoryLiveStore>,
        service: NotificationService,
    }

    fn setup() -> Setup {
        let env = TestEnv::new();
        let live = Arc::new(MemoryLiveStore::new());
        let service = NotificationService::new(env.notifications.clone(), live.clone());
        Setup { env, live, service }
    }

    async fn seed_mirrored(setup: &Setup, recipient: uuid::Uuid) -> Notification {
        let mut n = notification_for(recipient);
        let live_id = setup
            .live
            .add_document(NOTIFICATIONS_COLLECTION, &n.mirror_document())
            .await
            .unwrap();
        n.live_id = Some(live_id);
        setup.env.notifications.create(&n).await.unwrap();
        n
    }

    #[tokio::test]
    async fn test_mark_read_updates_both_stores() {
        let setup = setup();
        let recipient = uuid::Uuid::new_v4();
        let n = seed_mirrored(&setup, recipient).await;
        let ctx = ctx_for(recipient, UserRole::Buyer);

        let reference = NotificationRef::parse(&n.id.to_string());
        let updated = setup.service.mark_read(&ctx, &reference).await.unwrap();
        assert!(updated.seen);

        let stored = setup.env.notifications.find_by_id(n.id).await.unwrap().unwrap();
        assert!(stored.seen);

        let doc = setup
            .live
            .get_document(NOTIFICATIONS_COLLECTION, n.live_id.as_ref().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["seen"], serde_json::json!(true));
    }

    #[tokio::test]
    async fn test_mark_read_by_mirror_id() {
        let setup = setup();
        let recipient = uuid::Uuid::new_v4();
        let n = seed_mirrored(&setup, recipient).await;
        let ctx = ctx_for(recipient, UserRole::Seller);

        let reference = NotificationRef::parse(n.live_id.as_ref().unwrap());
        assert!(matches!(reference, NotificationRef::Mirror(_)));
        setup.service.mark_read(&ctx, &reference).await.unwrap();

        let stored = setup.env.notifications.find_by_id(n.id).await.unwrap().unwrap();
        assert!(stored.seen);
    }

    #[tokio::test]
    async fn test_mark_read_foreign_user_forbidden() {
        let setup = setup();
        let recipient = uuid::Uuid::new_v4();
        let n = seed_mirrored(&setup, recipient).await;
        let stranger = ctx_for(uuid::Uuid::new_v4(), UserRole::Buyer);

        let reference = NotificationRef::parse(&n.id.to_string());
        let err = setup.service.mark_read(&stranger, &reference).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        // Unchanged in both stores.
        let stored = setup.env.notifications.find_by_id(n.id).await.unwrap().unwrap();
        assert!(!stored.seen);
        let doc = setup
            .live
            .get_document(NOTIFICATIONS_COLLECTION, n.live_id.as_ref().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["seen"], serde_json::json!(false));
    }

    #[tokio::test]
    async fn test_mark_read_by_admin_allowed() {
        let setup = setup();
        let recipient = uuid::Uuid::new_v4();
        let n = seed_mirrored(&setup, recipient).await;
        let admin = ctx_for(uuid::Uuid::new_v4(), UserRole::Admin);

        let reference = NotificationRef::parse(&n.id.to_string());
        setup.service.mark_read(&admin, &reference).await.unwrap();
    }

    #[tokio::test]
    async fn test_mark_all_read_is_idempotent() {
        let setup = setup();
        let recipient = uuid::Uuid::new_v4();
        seed_mirrored(&setup, recipient).await;
        seed_mirrored(&setup, recipient).await;
        // One never-mirrored record must not break the batch.
        let unmirrored = notification_for(recipient);
        setup.env.notifications.create(&unmirrored).await.unwrap();

        let ctx = ctx_for(recipient, UserRole::Buyer);
        assert_eq!(setup.service.mark_all_read(&ctx).await.unwrap(), 3);
        assert_eq!(setup.service.mark_all_read(&ctx).await.unwrap(), 0);

        for row in setup.env.notifications.all() {
            assert!(row.seen);
            if let Some(live_id) = &row.live_id {
                let doc = setup
                    .live
                    .get_document(NOTIFICATIONS_COLLECTION, live_id)
                    .await
                    .unwrap()
                    .unwrap();
                assert_eq!(doc["seen"], serde_json::json!(true));
            }
        }
    }

    #[tokio::test]
    async fn test_delete_with_missing_mirror_succeeds() {
        let setup = setup();
        let recipient = uuid::Uuid::new_v4();
        // Mirror write previously failed: primary row only.
        let n = notification_for(recipient);
        setup.env.notifications.create(&n).await.unwrap();

        let ctx = ctx_for(recipient, UserRole::Buyer);
        let reference = NotificationRef::parse(&n.id.to_string());
        setup.service.delete(&ctx, &reference).await.unwrap();

        assert!(setup.env.notifications.find_by_id(n.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_mirror_then_primary() {
        let setup = setup();
        let recipient = uuid::Uuid::new_v4();
        let n = seed_mirrored(&setup, recipient).await;

        let ctx = ctx_for(recipient, UserRole::Buyer);
        setup
            .service
            .delete(&ctx, &NotificationRef::parse(&n.id.to_string()))
            .await
            .unwrap();

        assert!(setup.env.notifications.find_by_id(n.id).await.unwrap().is_none());
        assert!(
            setup
                .live
                .get_document(NOTIFICATIONS_COLLECTION, n.live_id.as_ref().unwrap())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_list_scopes_by_role() {
        let setup = setup();
        let user = uuid::Uuid::new_v4();
        let other = uuid::Uuid::new_v4();

        setup
            .env
            .notifications
            .create(&notification_for(user))
            .await
            .unwrap();
        setup
            .env
            .notifications
            .create(&notification_for(other))
            .await
            .unwrap();
        let mut admin_note = notification_for(uuid::Uuid::new_v4());
        admin_note.recipient_role = Some(UserRole::Admin);
        setup.env.notifications.create(&admin_note).await.unwrap();

        let page = PageRequest::default();
        let mine = setup
            .service
            .list(&ctx_for(user, UserRole::Buyer), page.clone())
            .await
            .unwrap();
        assert_eq!(mine.items.len(), 1);
        assert_eq!(mine.items[0].recipient_id, user);

        let admin_feed = setup
            .service
            .list(&ctx_for(uuid::Uuid::new_v4(), UserRole::Admin), page)
            .await
            .unwrap();
        assert_eq!(admin_feed.items.len(), 1);
        assert_eq!(admin_feed.items[0].recipient_role, Some(UserRole::Admin));
    }
}
