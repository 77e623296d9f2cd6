//! Transactional store contract
//!
//! Every write that touches team, player or user rows goes through a
//! [`StoreTransaction`]. A transaction that is dropped without
//! [`commit`](StoreTransaction::commit) rolls back, so an early return with
//! `?` never leaves partial state behind.

use std::fmt::Debug;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::player::{NewPlayer, Player, PlayerId};
use crate::domain::team::{NewTeam, Team, TeamId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Entry point for atomic units of work
#[async_trait]
pub trait TransactionalStore: Send + Sync + Debug {
    /// Begin a transaction with at least read-committed isolation
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, DomainError>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<(), DomainError>;
}

/// An open transaction against the team, player and identity stores
#[async_trait]
pub trait StoreTransaction: Send {
    /// Insert a user, failing with a duplicate-identity conflict when the
    /// email is already taken
    async fn create_user(&mut self, email: &str, password_hash: &str)
        -> Result<UserId, DomainError>;

    /// Insert a team
    async fn create_team(&mut self, team: NewTeam) -> Result<TeamId, DomainError>;

    /// Insert a squad for a team in one batch
    async fn insert_players(
        &mut self,
        team_id: TeamId,
        players: &[NewPlayer],
    ) -> Result<(), DomainError>;

    /// Read a player and hold a write lock on it until the transaction ends
    async fn lock_player(&mut self, id: PlayerId) -> Result<Option<Player>, DomainError>;

    /// Read a team and hold a write lock on it until the transaction ends
    async fn lock_team(&mut self, id: TeamId) -> Result<Option<Team>, DomainError>;

    /// Apply `budget = budget + delta` as a single arithmetic update
    async fn adjust_budget(&mut self, id: TeamId, delta: Decimal) -> Result<(), DomainError>;

    /// Reassign a player, set its new base value and clear its listing
    async fn transfer_player(
        &mut self,
        id: PlayerId,
        to: TeamId,
        new_base_value: Decimal,
    ) -> Result<(), DomainError>;

    /// Set (`Some(price)`) or clear (`None`) a player's listing
    async fn set_listing(&mut self, id: PlayerId, price: Option<Decimal>)
        -> Result<(), DomainError>;

    /// Overwrite a team's descriptive fields
    async fn update_team_profile(
        &mut self,
        id: TeamId,
        name: &str,
        country: &str,
    ) -> Result<(), DomainError>;

    /// Overwrite a player's descriptive fields
    async fn update_player_profile(
        &mut self,
        id: PlayerId,
        first_name: &str,
        last_name: &str,
        country: &str,
    ) -> Result<(), DomainError>;

    /// Make every change of this transaction visible atomically
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}
