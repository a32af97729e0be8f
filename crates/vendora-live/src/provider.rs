//! Live store manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use vendora_core::config::live::LiveStoreConfig;
use vendora_core::error::AppError;
use vendora_core::result::AppResult;
use vendora_core::traits::{LiveStore, LiveWrite};

/// Live store manager that wraps the configured provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct LiveStoreManager {
    /// The inner live store provider.
    inner: Arc<dyn LiveStore>,
}

impl LiveStoreManager {
    /// Create a new live store manager from configuration.
    pub async fn new(config: &LiveStoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn LiveStore> = match config.provider.as_str() {
            "redis" => {
                info!("Initializing Redis live store provider");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisLiveStore::new(
                    client,
                    config.redis.events_channel.clone(),
                ))
            }
            "memory" => {
                info!("Initializing in-memory live store provider");
                Arc::new(crate::memory::MemoryLiveStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown live store provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a live store manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn LiveStore>) -> Self {
        Self { inner: provider }
    }

    /// Get a shared handle to the inner provider.
    pub fn provider(&self) -> Arc<dyn LiveStore> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl LiveStore for LiveStoreManager {
    async fn add_document(
        &self,
        collection: &str,
        document: &serde_json::Value,
    ) -> AppResult<String> {
        self.inner.add_document(collection, document).await
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> AppResult<Option<serde_json::Value>> {
        self.inner.get_document(collection, id).await
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: &serde_json::Value,
    ) -> AppResult<()> {
        self.inner.update_document(collection, id, patch).await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> AppResult<()> {
        self.inner.delete_document(collection, id).await
    }

    async fn apply_batch(&self, collection: &str, writes: &[LiveWrite]) -> AppResult<()> {
        self.inner.apply_batch(collection, writes).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        // Bound the probe so a wedged backend cannot stall /health.
        match tokio::time::timeout(Duration::from_secs(2), self.inner.health_check()).await {
            Ok(result) => result,
            Err(_) => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_provider_selected() {
        let config = LiveStoreConfig {
            provider: "memory".to_string(),
            ..Default::default()
        };
        let manager = LiveStoreManager::new(&config).await.unwrap();
        assert!(manager.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let config = LiveStoreConfig {
            provider: "etcd".to_string(),
            ..Default::default()
        };
        assert!(LiveStoreManager::new(&config).await.is_err());
    }
}
