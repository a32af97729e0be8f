//! Document helpers shared by live store providers.

use chrono::Utc;
use uuid::Uuid;

/// Generate a provider-assigned document id.
///
/// Twenty hex characters: long enough to be collision-safe for a mirror
/// store, and deliberately not UUID-shaped so mirror ids and primary-store
/// ids stay distinguishable at the API boundary.
pub fn generate_document_id() -> String {
    let simple = Uuid::new_v4().simple().to_string();
    simple[..20].to_string()
}

/// Return a copy of `document` with a server-assigned `created_at`
/// timestamp, unless the caller already set one.
pub fn stamped(document: &serde_json::Value) -> serde_json::Value {
    let mut doc = document.clone();
    if let Some(map) = doc.as_object_mut() {
        map.entry("created_at".to_string())
            .or_insert_with(|| serde_json::json!(Utc::now()));
    }
    doc
}

/// Shallow-merge `patch` into `document`. Non-object inputs are left
/// untouched.
pub fn merge(document: &mut serde_json::Value, patch: &serde_json::Value) {
    if let (Some(doc_map), Some(patch_map)) = (document.as_object_mut(), patch.as_object()) {
        for (key, value) in patch_map {
            doc_map.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_not_uuid_shaped() {
        let id = generate_document_id();
        assert_eq!(id.len(), 20);
        assert!(Uuid::parse_str(&id).is_err());
    }

    #[test]
    fn test_stamped_adds_created_at_once() {
        let doc = serde_json::json!({ "title": "x" });
        let stamped_doc = stamped(&doc);
        assert!(stamped_doc["created_at"].is_string());

        let again = stamped(&stamped_doc);
        assert_eq!(again["created_at"], stamped_doc["created_at"]);
    }

    #[test]
    fn test_merge_overwrites_and_keeps() {
        let mut doc = serde_json::json!({ "seen": false, "title": "x" });
        merge(&mut doc, &serde_json::json!({ "seen": true }));
        assert_eq!(doc["seen"], serde_json::json!(true));
        assert_eq!(doc["title"], serde_json::json!("x"));
    }
}
