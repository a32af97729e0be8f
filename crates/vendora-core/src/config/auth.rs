//! Token validation configuration.
//!
//! Token issuance lives in the upstream identity service; this backend
//! only validates bearer tokens, so the configuration is limited to the
//! shared signing secret and optional issuer check.

use serde::{Deserialize, Serialize};

/// Bearer token validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret shared with the identity service.
    pub jwt_secret: String,
    /// Expected `iss` claim. Not checked when empty.
    #[serde(default)]
    pub issuer: String,
    /// Clock skew tolerance in seconds when validating `exp`.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

fn default_leeway() -> u64 {
    30
}
