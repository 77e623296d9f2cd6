//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Read access to the identity store
///
/// Users are created only inside a registration transaction, see
/// [`StoreTransaction::create_user`](crate::domain::storage::StoreTransaction::create_user).
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by their login email
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
}
