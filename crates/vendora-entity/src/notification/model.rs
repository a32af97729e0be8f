//! Notification entity model.
//!
//! A notification is logically one record materialized in two stores: the
//! durable primary row below, and a mirror document in the live-update
//! store. Once both writes succeed, `live_id` holds the mirror's document
//! id and the mirror's `primary_id` field holds this row's `id` — that
//! cross-reference is the only consistency mechanism between the stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use vendora_core::types::id::{ProductId, UserId};

use crate::user::UserRole;

use super::kind::NotificationKind;

/// A notification row in the primary store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Primary-store identifier.
    pub id: Uuid,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// What the notification is about.
    pub kind: NotificationKind,
    /// Related product, if any.
    pub product_id: Option<Uuid>,
    /// The user whose action triggered it, if any.
    pub sender_id: Option<Uuid>,
    /// The target user.
    pub recipient_id: Uuid,
    /// Role the notification was addressed under, if any.
    pub recipient_role: Option<UserRole>,
    /// Whether the recipient has read it.
    pub seen: bool,
    /// Extra structured data (order id, buyer/seller summaries, ...).
    pub meta: Option<serde_json::Value>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// The mirror document's id in the live store, once mirrored.
    pub live_id: Option<String>,
}

impl Notification {
    /// Build the mirror document for the live store.
    ///
    /// Carries the full payload plus `primary_id`; the live store assigns
    /// its own document id and a server-side `created_at`.
    pub fn mirror_document(&self) -> serde_json::Value {
        let mut doc = serde_json::json!({
            "title": self.title,
            "message": self.message,
            "kind": self.kind,
            "product_id": self.product_id,
            "sender_id": self.sender_id,
            "recipient_id": self.recipient_id,
            "recipient_role": self.recipient_role,
            "seen": self.seen,
            "primary_id": self.id,
        });
        if let Some(meta) = &self.meta {
            doc["meta"] = meta.clone();
        }
        doc
    }
}

/// Input for dispatching a new notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// What the notification is about.
    pub kind: NotificationKind,
    /// The target user.
    pub recipient: UserId,
    /// Role the notification is addressed under.
    pub recipient_role: Option<UserRole>,
    /// Related product.
    pub product: Option<ProductId>,
    /// The user whose action triggered it.
    pub sender: Option<UserId>,
    /// Extra structured data.
    pub meta: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_document_carries_primary_id() {
        let notification = Notification {
            id: Uuid::new_v4(),
            title: "New Order Placed".to_string(),
            message: "Your product \"Blue Mug\" has been purchased!".to_string(),
            kind: NotificationKind::Orders,
            product_id: Some(Uuid::new_v4()),
            sender_id: None,
            recipient_id: Uuid::new_v4(),
            recipient_role: Some(UserRole::Seller),
            seen: false,
            meta: Some(serde_json::json!({ "order_id": "abc" })),
            created_at: Utc::now(),
            live_id: None,
        };

        let doc = notification.mirror_document();
        assert_eq!(
            doc["primary_id"].as_str().unwrap(),
            notification.id.to_string()
        );
        assert_eq!(doc["seen"], serde_json::json!(false));
        assert_eq!(doc["kind"], serde_json::json!("orders"));
        assert_eq!(doc["meta"]["order_id"], serde_json::json!("abc"));
    }
}
