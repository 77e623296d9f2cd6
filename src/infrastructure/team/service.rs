//! Team service: squad view and profile edits

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::player::{Player, PlayerId, PlayerRepository};
use crate::domain::storage::TransactionalStore;
use crate::domain::team::{
    validate_country, validate_person_name, validate_team_name, Team, TeamRepository,
    TeamWithSquad,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Request for updating a team's descriptive fields
#[derive(Debug, Clone, Default)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub country: Option<String>,
}

/// Request for updating a player's descriptive fields
#[derive(Debug, Clone, Default)]
pub struct UpdatePlayerRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
}

/// Team service for managing a user's own team
#[derive(Debug)]
pub struct TeamService {
    teams: Arc<dyn TeamRepository>,
    players: Arc<dyn PlayerRepository>,
    store: Arc<dyn TransactionalStore>,
}

impl TeamService {
    pub fn new(
        teams: Arc<dyn TeamRepository>,
        players: Arc<dyn PlayerRepository>,
        store: Arc<dyn TransactionalStore>,
    ) -> Self {
        Self {
            teams,
            players,
            store,
        }
    }

    async fn own_team(&self, user_id: UserId) -> Result<Team, DomainError> {
        self.teams
            .get_by_owner(user_id)
            .await?
            .ok_or_else(DomainError::team_not_found)
    }

    /// Get the caller's team with its squad and total value
    pub async fn get_team_with_squad(&self, user_id: UserId) -> Result<TeamWithSquad, DomainError> {
        let team = self.own_team(user_id).await?;
        let players = self.players.list_by_team(team.id()).await?;

        debug!(team_id = %team.id(), players = players.len(), "Loaded squad");
        Ok(TeamWithSquad::new(team, players))
    }

    /// Update the caller's team name and/or country
    pub async fn update_team_profile(
        &self,
        user_id: UserId,
        request: UpdateTeamRequest,
    ) -> Result<Team, DomainError> {
        if let Some(name) = &request.name {
            validate_team_name(name)?;
        }
        if let Some(country) = &request.country {
            validate_country(country)?;
        }

        let team_id = self.own_team(user_id).await?.id();

        let mut tx = self.store.begin().await?;
        let mut team = tx
            .lock_team(team_id)
            .await?
            .ok_or_else(DomainError::team_not_found)?;

        if let Some(name) = request.name {
            team.set_name(name.trim());
        }
        if let Some(country) = request.country {
            team.set_country(country.trim());
        }

        tx.update_team_profile(team_id, team.name(), team.country())
            .await?;
        tx.commit().await?;

        info!(team_id = %team_id, "Updated team profile");
        Ok(team)
    }

    /// Update descriptive fields of a player on the caller's team
    pub async fn update_player_profile(
        &self,
        user_id: UserId,
        player_id: PlayerId,
        request: UpdatePlayerRequest,
    ) -> Result<Player, DomainError> {
        if let Some(first_name) = &request.first_name {
            validate_person_name(first_name)?;
        }
        if let Some(last_name) = &request.last_name {
            validate_person_name(last_name)?;
        }
        if let Some(country) = &request.country {
            validate_country(country)?;
        }

        let team = self.own_team(user_id).await?;

        let mut tx = self.store.begin().await?;
        let mut player = tx
            .lock_player(player_id)
            .await?
            .ok_or_else(DomainError::player_not_found)?;

        if !player.is_owned_by(team.id()) {
            warn!(player_id = %player_id, team_id = %team.id(), "Profile edit on foreign player");
            return Err(DomainError::not_owned());
        }

        if let Some(first_name) = request.first_name {
            player.set_first_name(first_name.trim());
        }
        if let Some(last_name) = request.last_name {
            player.set_last_name(last_name.trim());
        }
        if let Some(country) = request.country {
            player.set_country(country.trim());
        }

        tx.update_player_profile(
            player_id,
            player.first_name(),
            player.last_name(),
            player.country(),
        )
        .await?;
        tx.commit().await?;

        info!(player_id = %player_id, "Updated player profile");
        Ok(player)
    }
}
