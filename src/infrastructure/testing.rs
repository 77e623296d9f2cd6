//! Shared fixtures for service tests

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::player::{Player, PlayerRepository};
use crate::domain::team::{Team, TeamRepository};
use crate::domain::transfer::{AppreciationSource, FixedAppreciation};
use crate::domain::{DomainError, RandomSquadGenerator};

use super::auth::{JwtConfig, JwtService};
use super::registration::{RegisterRequest, Registration, RegistrationService};
use super::session::SessionManager;
use super::storage::{InMemoryStore, Stores};
use super::team::TeamService;
use super::transfer::TransferService;
use super::user::PasswordHasher;

pub const TEST_PASSWORD: &str = "secret1";

/// Reversible stand-in for Argon2 so tests stay fast
#[derive(Debug, Default)]
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        Ok(format!("plain${}", password))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        hash.strip_prefix("plain$") == Some(password)
    }
}

/// All services wired over one in-memory store
pub struct TestContext {
    pub store: InMemoryStore,
    pub stores: Stores,
    pub registration: RegistrationService,
    pub sessions: SessionManager,
    pub teams: TeamService,
    pub transfers: TransferService,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_appreciation(Arc::new(FixedAppreciation::new(Decimal::new(15, 1))))
    }

    pub fn with_appreciation(appreciation: Arc<dyn AppreciationSource>) -> Self {
        let store = InMemoryStore::new();
        let stores = Stores::in_memory(store.clone());
        let hasher: Arc<dyn PasswordHasher> = Arc::new(PlainHasher);

        let registration = RegistrationService::new(
            stores.transactions.clone(),
            hasher.clone(),
            Arc::new(RandomSquadGenerator::new()),
        );
        let sessions = SessionManager::new(
            stores.users.clone(),
            stores.sessions.clone(),
            hasher,
            Arc::new(JwtService::new(JwtConfig::new("test-secret", 30))),
            chrono::Duration::days(7),
        );
        let teams = TeamService::new(
            stores.teams.clone(),
            stores.players.clone(),
            stores.transactions.clone(),
        );
        let transfers = TransferService::new(
            stores.teams.clone(),
            stores.players.clone(),
            stores.transactions.clone(),
            appreciation,
        );

        Self {
            store,
            stores,
            registration,
            sessions,
            teams,
            transfers,
        }
    }

    pub async fn register(&self, email: &str) -> Registration {
        self.registration
            .register(RegisterRequest {
                email: email.to_string(),
                password: TEST_PASSWORD.to_string(),
                team_name: format!("{} FC", email),
                country: "NL".to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn team(&self, registration: &Registration) -> Team {
        self.stores
            .teams
            .get(registration.team_id)
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn squad(&self, registration: &Registration) -> Vec<Player> {
        self.stores
            .players
            .list_by_team(registration.team_id)
            .await
            .unwrap()
    }

    /// Sum of every team's budget
    pub async fn total_budget(&self, registrations: &[&Registration]) -> Decimal {
        let mut total = Decimal::ZERO;
        for registration in registrations {
            total += self.team(registration).await.budget();
        }
        total
    }
}
