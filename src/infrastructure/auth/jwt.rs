//! Access token generation and validation

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use uuid::Uuid;

use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Kind of credential a token represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Access token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    pub token_type: TokenType,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
    /// Unique token id, keeps two tokens issued in the same second distinct
    pub jti: String,
}

impl AccessClaims {
    /// Create claims for a user valid for `ttl` starting at `now`
    pub fn new(user_id: UserId, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: user_id.to_string(),
            token_type: TokenType::Access,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Result<UserId, DomainError> {
        self.sub
            .parse::<i64>()
            .map(UserId::new)
            .map_err(|_| DomainError::invalid_token())
    }
}

/// Configuration for JWT service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret used for signing
    pub secret: String,
    /// Access token lifetime in minutes
    pub access_ttl_minutes: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, access_ttl_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            access_ttl_minutes,
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_ttl_minutes: 30,
        }
    }
}

/// Trait for access token operations
pub trait JwtGenerator: Send + Sync + Debug {
    /// Issue an access token for a user
    fn generate(&self, user_id: UserId) -> Result<String, DomainError>;

    /// Validate an access token and return its claims
    fn validate(&self, token: &str) -> Result<AccessClaims, DomainError>;

    /// Access token lifetime
    fn access_ttl(&self) -> Duration;
}

/// HS256 JWT service
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_ttl_minutes", &self.config.access_ttl_minutes)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

impl JwtGenerator for JwtService {
    fn generate(&self, user_id: UserId) -> Result<String, DomainError> {
        let claims = AccessClaims::new(user_id, Utc::now(), self.access_ttl());

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign access token: {}", e)))
    }

    fn validate(&self, token: &str) -> Result<AccessClaims, DomainError> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &Self::validation())
            .map_err(|_| DomainError::invalid_token())?;

        if token_data.claims.token_type != TokenType::Access {
            return Err(DomainError::invalid_token());
        }

        Ok(token_data.claims)
    }

    fn access_ttl(&self) -> Duration {
        Duration::minutes(self.config.access_ttl_minutes)
    }
}
