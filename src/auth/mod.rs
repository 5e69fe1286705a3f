pub mod scopes;

pub use scopes::{Role, Scope, ScopeError, ScopeRegistry};

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

/// JWT claims issued at signup, signin and verification
///
/// The role travels in the token: protected routes authorize against the
/// claim without a database round trip, and flows that change a user's role
/// issue a fresh token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sub: Uuid, email: String, name: String, role: Role) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub,
            email,
            name,
            role,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("JWT secret is not configured")]
    MissingSecret,
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_expire_after_the_configured_window() {
        let claims = Claims::new(
            Uuid::new_v4(),
            "user@example.com".to_string(),
            "User".to_string(),
            Role::User,
        );

        let expiry_hours = config::config().security.jwt_expiry_hours as i64;
        assert_eq!((claims.exp - claims.iat) / 3600, expiry_hours);
    }

    #[test]
    fn role_claim_serializes_as_screaming_snake_case() {
        let claims = Claims::new(
            Uuid::new_v4(),
            "admin@example.com".to_string(),
            "Admin".to_string(),
            Role::Admin,
        );

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["role"], "ADMIN");
    }
}
