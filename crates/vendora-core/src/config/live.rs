//! Secondary live-update store configuration.

use serde::{Deserialize, Serialize};

/// Top-level live store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveStoreConfig {
    /// Live store provider type: `"redis"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Redis-specific configuration.
    #[serde(default)]
    pub redis: RedisLiveConfig,
}

impl Default for LiveStoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            redis: RedisLiveConfig::default(),
        }
    }
}

/// Redis live store backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisLiveConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Key prefix for all Vendora live-store keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Pub/sub channel suffix on which document writes are published.
    #[serde(default = "default_events_channel")]
    pub events_channel: String,
}

impl Default for RedisLiveConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
            events_channel: default_events_channel(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "vendora:".to_string()
}

fn default_events_channel() -> String {
    "events".to_string()
}
