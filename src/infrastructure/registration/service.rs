//! Registration flow: identity, team and starting squad in one unit

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::squad::{SquadGenerator, STARTING_BUDGET};
use crate::domain::storage::TransactionalStore;
use crate::domain::team::{validate_country, validate_team_name, NewTeam, TeamId};
use crate::domain::user::{normalize_email, validate_email, validate_password, UserId};
use crate::domain::{DomainError, ErrorCode};
use crate::infrastructure::user::PasswordHasher;

/// Request for registering a new manager
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub team_name: String,
    pub country: String,
}

/// Identifiers created by a successful registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub user_id: UserId,
    pub team_id: TeamId,
}

/// Creates a user, their team and its generated squad atomically
#[derive(Debug)]
pub struct RegistrationService {
    store: Arc<dyn TransactionalStore>,
    hasher: Arc<dyn PasswordHasher>,
    squads: Arc<dyn SquadGenerator>,
}

impl RegistrationService {
    pub fn new(
        store: Arc<dyn TransactionalStore>,
        hasher: Arc<dyn PasswordHasher>,
        squads: Arc<dyn SquadGenerator>,
    ) -> Self {
        Self {
            store,
            hasher,
            squads,
        }
    }

    /// Register a new user with a starting team
    ///
    /// Either the user, the team and all players exist afterwards, or none
    /// of them do.
    pub async fn register(&self, request: RegisterRequest) -> Result<Registration, DomainError> {
        let email = normalize_email(&request.email);

        validate_email(&email)?;
        validate_password(&request.password)?;
        validate_team_name(&request.team_name)?;
        validate_country(&request.country)?;

        let password_hash = self.hasher.hash(&request.password)?;
        let squad = self.squads.generate();

        let mut tx = self.store.begin().await?;

        let user_id = tx.create_user(&email, &password_hash).await.inspect_err(|e| {
            if e.code() == ErrorCode::EmailExists {
                warn!("Registration rejected: email already in use");
            }
        })?;

        let team_id = tx
            .create_team(NewTeam {
                owner_id: user_id,
                name: request.team_name.trim().to_string(),
                country: request.country.trim().to_string(),
                budget: STARTING_BUDGET,
            })
            .await?;

        tx.insert_players(team_id, &squad).await?;
        tx.commit().await?;

        info!(
            user_id = %user_id,
            team_id = %team_id,
            players = squad.len(),
            "Registered new user"
        );

        Ok(Registration { user_id, team_id })
    }
}
