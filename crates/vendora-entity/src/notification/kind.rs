//! Notification kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Order placement and status changes.
    Orders,
    /// Product submission and approval.
    Products,
    /// Stock levels and restocks.
    Inventory,
    /// Account-related events.
    Users,
    /// Operational messages.
    System,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Orders => write!(f, "orders"),
            Self::Products => write!(f, "products"),
            Self::Inventory => write!(f, "inventory"),
            Self::Users => write!(f, "users"),
            Self::System => write!(f, "system"),
        }
    }
}
