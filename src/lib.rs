//! Squad Market API
//!
//! A fantasy-football backend where each account owns one team:
//! - Registration creates the account, its team and a 20-player squad atomically
//! - Short-lived JWT access tokens with rotating, store-backed refresh tokens
//! - A transfer market whose purchases move money and players in one transaction
//! - PostgreSQL or in-memory storage behind the same repository traits

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::{AppState, ServiceComponents};
use domain::{RandomAppreciation, RandomSquadGenerator};
use infrastructure::auth::JwtService;
use infrastructure::storage::{StorageFactory, Stores};
use infrastructure::user::Argon2Hasher;
use tracing::{info, warn};

/// Secret shipped in the default configuration; never valid in production
const DEFAULT_JWT_SECRET_MARKER: &str = "change-me";

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = config.storage_config();
    info!("Storage backend: {:?}", storage_config.storage_type());

    let stores = StorageFactory::create(&storage_config).await?;
    Ok(build_app_state(&stores, config))
}

/// Wire the production services over an existing set of stores
pub fn build_app_state(stores: &Stores, config: &AppConfig) -> AppState {
    if config.auth.jwt_secret.contains(DEFAULT_JWT_SECRET_MARKER) {
        warn!("Using the default JWT secret; set APP__AUTH__JWT_SECRET");
    }

    AppState::new(
        stores,
        ServiceComponents {
            hasher: Arc::new(Argon2Hasher::new()),
            jwt: Arc::new(JwtService::new(config.auth.to_jwt_config())),
            refresh_ttl: config.auth.refresh_ttl(),
            squads: Arc::new(RandomSquadGenerator::new()),
            appreciation: Arc::new(RandomAppreciation::new()),
        },
    )
}
