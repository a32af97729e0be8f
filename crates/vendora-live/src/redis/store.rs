//! Redis live store provider implementation.
//!
//! Documents are JSON strings at `{prefix}{collection}:{id}`. Every write
//! is also published on `{prefix}{collection}:{events_channel}` so
//! subscribed clients receive live updates without polling.

use async_trait::async_trait;
use redis::AsyncCommands;

use vendora_core::error::{AppError, ErrorKind};
use vendora_core::result::AppResult;
use vendora_core::traits::{LiveStore, LiveWrite};

use crate::document;

use super::client::RedisClient;

/// Redis-backed live store provider.
#[derive(Debug, Clone)]
pub struct RedisLiveStore {
    /// Redis client.
    client: RedisClient,
    /// Channel name suffix for published write events.
    events_channel: String,
}

impl RedisLiveStore {
    /// Create a new Redis live store provider.
    pub fn new(client: RedisClient, events_channel: impl Into<String>) -> Self {
        Self {
            client,
            events_channel: events_channel.into(),
        }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::LiveStore, format!("Redis error: {e}"), e)
    }

    fn doc_key(&self, collection: &str, id: &str) -> String {
        self.client.prefixed_key(&format!("{collection}:{id}"))
    }

    fn channel(&self, collection: &str) -> String {
        self.client
            .prefixed_key(&format!("{collection}:{}", self.events_channel))
    }

    async fn publish(&self, collection: &str, event: serde_json::Value) -> AppResult<()> {
        let mut conn = self.client.conn_mut();
        let _: () = conn
            .publish(self.channel(collection), event.to_string())
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }
}

#[async_trait]
impl LiveStore for RedisLiveStore {
    async fn add_document(
        &self,
        collection: &str,
        document: &serde_json::Value,
    ) -> AppResult<String> {
        let id = document::generate_document_id();
        let doc = document::stamped(document);

        let mut conn = self.client.conn_mut();
        let _: () = conn
            .set(self.doc_key(collection, &id), doc.to_string())
            .await
            .map_err(Self::map_err)?;

        self.publish(
            collection,
            serde_json::json!({ "op": "add", "id": id, "doc": doc }),
        )
        .await?;

        Ok(id)
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> AppResult<Option<serde_json::Value>> {
        let mut conn = self.client.conn_mut();
        let raw: Option<String> = conn
            .get(self.doc_key(collection, id))
            .await
            .map_err(Self::map_err)?;

        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: &serde_json::Value,
    ) -> AppResult<()> {
        // Read-merge-write; a missing document is a recoverable anomaly
        // (it exists only in the primary store), so skip silently.
        let Some(mut doc) = self.get_document(collection, id).await? else {
            return Ok(());
        };
        document::merge(&mut doc, patch);

        let mut conn = self.client.conn_mut();
        let _: () = conn
            .set(self.doc_key(collection, id), doc.to_string())
            .await
            .map_err(Self::map_err)?;

        self.publish(
            collection,
            serde_json::json!({ "op": "update", "id": id, "patch": patch }),
        )
        .await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> AppResult<()> {
        let mut conn = self.client.conn_mut();
        let removed: i64 = conn
            .del(self.doc_key(collection, id))
            .await
            .map_err(Self::map_err)?;

        if removed > 0 {
            self.publish(
                collection,
                serde_json::json!({ "op": "delete", "id": id }),
            )
            .await?;
        }
        Ok(())
    }

    async fn apply_batch(&self, collection: &str, writes: &[LiveWrite]) -> AppResult<()> {
        if writes.is_empty() {
            return Ok(());
        }

        // Merge against current state first, then flush every SET and the
        // event publishes as one atomic pipeline.
        let mut merged = Vec::with_capacity(writes.len());
        for write in writes {
            if let Some(mut doc) = self.get_document(collection, &write.id).await? {
                document::merge(&mut doc, &write.patch);
                merged.push((write, doc));
            }
        }

        let mut pipe = redis::pipe();
        pipe.atomic();
        for (write, doc) in &merged {
            pipe.set(self.doc_key(collection, &write.id), doc.to_string())
                .ignore();
            pipe.publish(
                self.channel(collection),
                serde_json::json!({ "op": "update", "id": write.id, "patch": write.patch })
                    .to_string(),
            )
            .ignore();
        }

        let mut conn = self.client.conn_mut();
        let _: () = pipe.query_async(&mut conn).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
