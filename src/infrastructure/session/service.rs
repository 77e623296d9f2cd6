//! Session manager: credentials in, tokens out

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::domain::session::{NewSession, SessionRepository};
use crate::domain::user::{normalize_email, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::{generate_refresh_token, hash_refresh_token, JwtGenerator};
use crate::infrastructure::user::PasswordHasher;

/// Password verified against when the email is unknown
const DUMMY_PASSWORD: &str = "dummy-password-for-timing";

/// Token pair handed to a client after login or refresh
#[derive(Debug, Clone, Serialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

/// Issues, validates and rotates access and refresh credentials
#[derive(Debug)]
pub struct SessionManager {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    hasher: Arc<dyn PasswordHasher>,
    jwt: Arc<dyn JwtGenerator>,
    refresh_ttl: Duration,
    dummy_hash: OnceCell<String>,
}

impl SessionManager {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        hasher: Arc<dyn PasswordHasher>,
        jwt: Arc<dyn JwtGenerator>,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            hasher,
            jwt,
            refresh_ttl,
            dummy_hash: OnceCell::new(),
        }
    }

    /// Check an email and password pair
    ///
    /// Unknown emails and wrong passwords fail identically, including in
    /// the amount of hashing work done.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<UserId, DomainError> {
        let email = normalize_email(email);

        match self.users.get_by_email(&email).await? {
            Some(user) if self.hasher.verify(password, user.password_hash()) => {
                debug!(user_id = %user.id(), "Credentials verified");
                Ok(user.id())
            }
            Some(user) => {
                warn!(user_id = %user.id(), "Password mismatch");
                Err(DomainError::invalid_credentials())
            }
            None => {
                let dummy = self
                    .dummy_hash
                    .get_or_try_init(|| async { self.hasher.hash(DUMMY_PASSWORD) })
                    .await?;
                let _ = self.hasher.verify(password, dummy);

                warn!("Login attempt for unknown email");
                Err(DomainError::invalid_credentials())
            }
        }
    }

    /// Open a session and mint its first token pair
    pub async fn issue_session(&self, user_id: UserId) -> Result<SessionTokens, DomainError> {
        let now = Utc::now();
        let access_token = self.jwt.generate(user_id)?;
        let refresh_token = generate_refresh_token();
        let refresh_expires_at = now + self.refresh_ttl;

        let session = self
            .sessions
            .create(NewSession {
                user_id,
                refresh_token_hash: hash_refresh_token(&refresh_token),
                refresh_expires_at,
            })
            .await?;

        info!(user_id = %user_id, session_id = %session.id, "Session issued");

        Ok(SessionTokens {
            access_token,
            refresh_token,
            access_expires_at: now + self.jwt.access_ttl(),
            refresh_expires_at,
        })
    }

    /// Authenticate and issue a session in one step
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionTokens, DomainError> {
        let user_id = self.authenticate(email, password).await?;
        self.issue_session(user_id).await
    }

    /// Resolve an access token to the user it was issued for
    pub fn resolve(&self, access_token: &str) -> Result<UserId, DomainError> {
        self.jwt.validate(access_token)?.user_id()
    }

    /// Trade a refresh token for a new token pair
    ///
    /// The presented token is rotated out, so it cannot be used again. The
    /// session keeps its original refresh expiry.
    pub async fn refresh(&self, refresh_token: &str) -> Result<SessionTokens, DomainError> {
        let current_hash = hash_refresh_token(refresh_token);

        let session = self
            .sessions
            .find_by_refresh_hash(&current_hash)
            .await?
            .ok_or_else(DomainError::invalid_token)?;

        let now = Utc::now();
        if session.is_expired_at(now) {
            self.sessions.delete(session.id).await?;
            debug!(session_id = %session.id, "Expired session removed");
            return Err(DomainError::invalid_token());
        }

        let next_token = generate_refresh_token();
        let rotated = self
            .sessions
            .rotate(session.id, &current_hash, &hash_refresh_token(&next_token))
            .await?;

        if !rotated {
            warn!(session_id = %session.id, "Refresh token already used");
            return Err(DomainError::invalid_token());
        }

        let access_token = self.jwt.generate(session.user_id)?;
        debug!(session_id = %session.id, "Session refreshed");

        Ok(SessionTokens {
            access_token,
            refresh_token: next_token,
            access_expires_at: now + self.jwt.access_ttl(),
            refresh_expires_at: session.refresh_expires_at,
        })
    }

    /// End the session a refresh token belongs to; unknown tokens are ignored
    pub async fn logout(&self, refresh_token: &str) -> Result<(), DomainError> {
        let hash = hash_refresh_token(refresh_token);

        if let Some(session) = self.sessions.find_by_refresh_hash(&hash).await? {
            self.sessions.delete(session.id).await?;
            info!(user_id = %session.user_id, session_id = %session.id, "Session ended");
        }

        Ok(())
    }
}
