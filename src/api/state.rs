//! Application state for shared services

use std::sync::Arc;

use crate::api::i18n::MessageCatalog;
use crate::domain::storage::TransactionalStore;
use crate::domain::transfer::AppreciationSource;
use crate::domain::SquadGenerator;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::registration::RegistrationService;
use crate::infrastructure::session::SessionManager;
use crate::infrastructure::storage::Stores;
use crate::infrastructure::team::TeamService;
use crate::infrastructure::transfer::TransferService;
use crate::infrastructure::user::PasswordHasher;

/// Pluggable parts the services are built from
pub struct ServiceComponents {
    pub hasher: Arc<dyn PasswordHasher>,
    pub jwt: Arc<dyn JwtGenerator>,
    pub refresh_ttl: chrono::Duration,
    pub squads: Arc<dyn SquadGenerator>,
    pub appreciation: Arc<dyn AppreciationSource>,
}

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub registration: Arc<RegistrationService>,
    pub teams: Arc<TeamService>,
    pub transfers: Arc<TransferService>,
    pub store: Arc<dyn TransactionalStore>,
    pub catalog: Arc<MessageCatalog>,
}

impl AppState {
    /// Wire every service over one set of stores
    pub fn new(stores: &Stores, components: ServiceComponents) -> Self {
        let sessions = SessionManager::new(
            stores.users.clone(),
            stores.sessions.clone(),
            components.hasher.clone(),
            components.jwt,
            components.refresh_ttl,
        );
        let registration = RegistrationService::new(
            stores.transactions.clone(),
            components.hasher,
            components.squads,
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
            components.appreciation,
        );

        Self {
            sessions: Arc::new(sessions),
            registration: Arc::new(registration),
            teams: Arc::new(teams),
            transfers: Arc::new(transfers),
            store: stores.transactions.clone(),
            catalog: Arc::new(MessageCatalog::new()),
        }
    }
}
