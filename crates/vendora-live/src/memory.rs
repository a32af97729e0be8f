//! In-memory live store implementation.
//!
//! Used in development and tests. Stores documents in a `DashMap`; there
//! are no connected clients, so nothing is published.

use async_trait::async_trait;
use dashmap::DashMap;

use vendora_core::result::AppResult;
use vendora_core::traits::{LiveStore, LiveWrite};

use crate::document;

/// In-memory live store provider.
#[derive(Debug, Default)]
pub struct MemoryLiveStore {
    /// Documents keyed by `collection:id`.
    documents: DashMap<String, serde_json::Value>,
}

impl MemoryLiveStore {
    /// Create an empty in-memory live store.
    pub fn new() -> Self {
        Self::default()
    }

    fn key(collection: &str, id: &str) -> String {
        format!("{collection}:{id}")
    }

    /// Number of documents in a collection. Test helper.
    pub fn collection_len(&self, collection: &str) -> usize {
        let prefix = format!("{collection}:");
        self.documents
            .iter()
            .filter(|entry| entry.key().starts_with(&prefix))
            .count()
    }
}

#[async_trait]
impl LiveStore for MemoryLiveStore {
    async fn add_document(
        &self,
        collection: &str,
        document: &serde_json::Value,
    ) -> AppResult<String> {
        let id = document::generate_document_id();
        self.documents
            .insert(Self::key(collection, &id), document::stamped(document));
        Ok(id)
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> AppResult<Option<serde_json::Value>> {
        Ok(self
            .documents
            .get(&Self::key(collection, id))
            .map(|entry| entry.value().clone()))
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: &serde_json::Value,
    ) -> AppResult<()> {
        if let Some(mut entry) = self.documents.get_mut(&Self::key(collection, id)) {
            document::merge(entry.value_mut(), patch);
        }
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> AppResult<()> {
        self.documents.remove(&Self::key(collection, id));
        Ok(())
    }

    async fn apply_batch(&self, collection: &str, writes: &[LiveWrite]) -> AppResult<()> {
        for write in writes {
            self.update_document(collection, &write.id, &write.patch)
                .await?;
        }
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_then_get() {
        let store = MemoryLiveStore::new();
        let id = store
            .add_document("notifications", &serde_json::json!({ "seen": false }))
            .await
            .unwrap();

        let doc = store.get_document("notifications", &id).await.unwrap();
        let doc = doc.expect("document should exist");
        assert_eq!(doc["seen"], serde_json::json!(false));
        assert!(doc["created_at"].is_string());
    }

    #[tokio::test]
    async fn test_update_missing_is_noop() {
        let store = MemoryLiveStore::new();
        store
            .update_document("notifications", "nope", &serde_json::json!({ "seen": true }))
            .await
            .unwrap();
        assert_eq!(store.collection_len("notifications"), 0);
    }

    #[tokio::test]
    async fn test_batch_patches_all() {
        let store = MemoryLiveStore::new();
        let a = store
            .add_document("notifications", &serde_json::json!({ "seen": false }))
            .await
            .unwrap();
        let b = store
            .add_document("notifications", &serde_json::json!({ "seen": false }))
            .await
            .unwrap();

        let writes: Vec<LiveWrite> = [&a, &b]
            .iter()
            .map(|id| LiveWrite {
                id: id.to_string(),
                patch: serde_json::json!({ "seen": true }),
            })
            .collect();
        store.apply_batch("notifications", &writes).await.unwrap();

        for id in [a, b] {
            let doc = store.get_document("notifications", &id).await.unwrap();
            assert_eq!(doc.unwrap()["seen"], serde_json::json!(true));
        }
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryLiveStore::new();
        let id = store
            .add_document("notifications", &serde_json::json!({}))
            .await
            .unwrap();
        store.delete_document("notifications", &id).await.unwrap();
        store.delete_document("notifications", &id).await.unwrap();
        assert!(
            store
                .get_document("notifications", &id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
