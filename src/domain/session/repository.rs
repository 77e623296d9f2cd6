//! Session repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewSession, Session, SessionId};
use crate::domain::DomainError;

/// Storage for refresh-token sessions
#[async_trait]
pub trait SessionRepository: Send + Sync + Debug {
    /// Persist a new session
    async fn create(&self, session: NewSession) -> Result<Session, DomainError>;

    /// Find a session by the digest of its refresh token
    async fn find_by_refresh_hash(&self, hash: &str) -> Result<Option<Session>, DomainError>;

    /// Replace the refresh digest if it still equals `current_hash`
    ///
    /// Returns `false` when another caller rotated or deleted the session
    /// first, which makes each refresh token usable exactly once.
    async fn rotate(
        &self,
        id: SessionId,
        current_hash: &str,
        new_hash: &str,
    ) -> Result<bool, DomainError>;

    /// Delete a session, returns true if deleted
    async fn delete(&self, id: SessionId) -> Result<bool, DomainError>;
}
