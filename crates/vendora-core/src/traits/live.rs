//! Live-update store trait for pluggable secondary store backends.
//!
//! The live store is a push-capable mirror of selected primary-store
//! records. It offers document add/update/delete and batched writes over
//! schemaless JSON documents; the provider assigns document ids. It is
//! never the source of truth — a document missing from the live store is
//! a recoverable anomaly, so update and delete on an absent document are
//! no-ops rather than errors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// One entry of a batched live-store write: a shallow patch applied to an
/// existing document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveWrite {
    /// The live store's document id.
    pub id: String,
    /// Fields to merge into the document.
    pub patch: serde_json::Value,
}

/// Trait for live-update store backends (Redis or in-memory).
///
/// Documents are JSON objects grouped into named collections. Providers
/// are responsible for key prefixing and for publishing write events to
/// connected clients where the backend supports push.
#[async_trait]
pub trait LiveStore: Send + Sync + std::fmt::Debug + 'static {
    /// Add a document to a collection. Returns the provider-assigned
    /// document id.
    async fn add_document(
        &self,
        collection: &str,
        document: &serde_json::Value,
    ) -> AppResult<String>;

    /// Fetch a document by id. Returns `None` if it does not exist.
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> AppResult<Option<serde_json::Value>>;

    /// Shallow-merge `patch` into an existing document. A missing
    /// document is a no-op.
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: &serde_json::Value,
    ) -> AppResult<()>;

    /// Delete a document. A missing document is a no-op.
    async fn delete_document(&self, collection: &str, id: &str) -> AppResult<()>;

    /// Apply a batch of patches as one logical write.
    async fn apply_batch(&self, collection: &str, writes: &[LiveWrite]) -> AppResult<()>;

    /// Check that the live store backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
