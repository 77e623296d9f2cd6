//! Player repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Player, PlayerId};
use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// Read access to players outside of a transaction
#[async_trait]
pub trait PlayerRepository: Send + Sync + Debug {
    /// Get a player by ID
    async fn get(&self, id: PlayerId) -> Result<Option<Player>, DomainError>;

    /// List a team's squad ordered by player ID
    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<Player>, DomainError>;

    /// List every player on the transfer list ordered by player ID
    async fn list_on_market(&self) -> Result<Vec<Player>, DomainError>;
}
