//! Team repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Team, TeamId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Read access to teams outside of a transaction
#[async_trait]
pub trait TeamRepository: Send + Sync + Debug {
    /// Get a team by ID
    async fn get(&self, id: TeamId) -> Result<Option<Team>, DomainError>;

    /// Get the team owned by a user
    async fn get_by_owner(&self, owner_id: UserId) -> Result<Option<Team>, DomainError>;
}
