//! Dual-store notification reference.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vendora_core::types::id::NotificationId;

/// A client-supplied notification identifier, which may be either store's
/// native id.
///
/// UUID-shaped ids are looked up in the primary store first, falling back
/// to a mirror-id lookup; anything else can only be a mirror id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationRef {
    /// A primary-store row id.
    Primary(NotificationId),
    /// A live-store document id.
    Mirror(String),
}

impl NotificationRef {
    /// Classify a raw path segment.
    pub fn parse(raw: &str) -> Self {
        match Uuid::parse_str(raw) {
            Ok(uuid) => Self::Primary(NotificationId::from_uuid(uuid)),
            Err(_) => Self::Mirror(raw.to_string()),
        }
    }
}

impl fmt::Display for NotificationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(id) => write!(f, "{id}"),
            Self::Mirror(id) => write!(f, "{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_classified_as_primary() {
        let id = Uuid::new_v4();
        match NotificationRef::parse(&id.to_string()) {
            NotificationRef::Primary(primary) => assert_eq!(primary.into_uuid(), id),
            other => panic!("expected Primary, got {other:?}"),
        }
    }

    #[test]
    fn test_opaque_string_classified_as_mirror() {
        match NotificationRef::parse("f8a2c91d4be04d1f") {
            NotificationRef::Mirror(id) => assert_eq!(id, "f8a2c91d4be04d1f"),
            other => panic!("expected Mirror, got {other:?}"),
        }
    }
}
