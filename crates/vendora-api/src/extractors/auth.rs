//! `AuthUser` extractor — pulls the bearer token from the Authorization
//! header, validates it, and injects the request context.
//!
//! Token issuance belongs to the upstream identity service; this backend
//! only verifies the shared-secret signature and reads the principal.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vendora_core::config::auth::AuthConfig;
use vendora_core::error::AppError;
use vendora_entity::user::UserRole;
use vendora_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Claims payload expected in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — the user ID.
    pub sub: Uuid,
    /// User role at the time of token issuance.
    pub role: UserRole,
    /// Display name for notification payloads.
    #[serde(default)]
    pub name: String,
    /// Email for notification payloads.
    #[serde(default)]
    pub email: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))?;

        let claims = decode_token(token, &state.config.auth)?;

        Ok(AuthUser(RequestContext::new(
            claims.sub,
            claims.role,
            claims.name,
            claims.email,
        )))
    }
}

/// Decode and validate a bearer token against the configured secret.
pub fn decode_token(token: &str, config: &AuthConfig) -> Result<TokenClaims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = config.leeway_seconds;
    if !config.issuer.is_empty() {
        validation.set_issuer(&[&config.issuer]);
    }

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::unauthorized("Token has expired")
        }
        jsonwebtoken::errors::ErrorKind::InvalidSignature => {
            AppError::unauthorized("Invalid token signature")
        }
        _ => AppError::unauthorized(format!("Token validation failed: {e}")),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use vendora_core::error::ErrorKind;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            issuer: String::new(),
            leeway_seconds: 30,
        }
    }

    fn token_for(claims: &TokenClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_roundtrip() {
        let claims = TokenClaims {
            sub: Uuid::new_v4(),
            role: UserRole::Seller,
            name: "Sara".to_string(),
            email: "sara@example.com".to_string(),
            exp: Utc::now().timestamp() + 3600,
        };
        let token = token_for(&claims, "test-secret");

        let decoded = decode_token(&token, &config()).unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.role, UserRole::Seller);
        assert_eq!(decoded.name, "Sara");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = TokenClaims {
            sub: Uuid::new_v4(),
            role: UserRole::Buyer,
            name: String::new(),
            email: String::new(),
            exp: Utc::now().timestamp() + 3600,
        };
        let token = token_for(&claims, "other-secret");

        let err = decode_token(&token, &config()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn test_expired_rejected() {
        let claims = TokenClaims {
            sub: Uuid::new_v4(),
            role: UserRole::Buyer,
            name: String::new(),
            email: String::new(),
            exp: Utc::now().timestamp() - 3600,
        };
        let token = token_for(&claims, "test-secret");

        let err = decode_token(&token, &config()).unwrap_err();
        assert_eq!(err.message, "Token has expired");
    }
}
