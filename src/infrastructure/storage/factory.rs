//! Storage factory for runtime backend selection

use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::domain::player::PlayerRepository;
use crate::domain::session::SessionRepository;
use crate::domain::storage::TransactionalStore;
use crate::domain::team::TeamRepository;
use crate::domain::user::UserRepository;
use crate::domain::DomainError;

use super::in_memory::InMemoryStore;
use super::migrations::run_migrations;
use super::postgres::{connect_pool, PostgresConfig, PostgresStore};

/// Supported storage backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// PostgreSQL storage
    #[default]
    Postgres,
    /// In-memory storage (for testing/development)
    Memory,
}

impl FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::Memory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(format!("Unknown storage backend '{}'", other)),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::Memory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Every repository the services need, backed by one store
#[derive(Debug, Clone)]
pub struct Stores {
    pub users: Arc<dyn UserRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub players: Arc<dyn PlayerRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub transactions: Arc<dyn TransactionalStore>,
}

impl Stores {
    fn from_backend<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + TeamRepository
            + PlayerRepository
            + SessionRepository
            + TransactionalStore
            + 'static,
    {
        Self {
            users: store.clone(),
            teams: store.clone(),
            players: store.clone(),
            sessions: store.clone(),
            transactions: store,
        }
    }

    /// Repositories over a shared in-memory store
    pub fn in_memory(store: InMemoryStore) -> Self {
        Self::from_backend(Arc::new(store))
    }
}

/// Factory for creating store instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Create the configured backend, applying pending migrations to Postgres
    pub async fn create(config: &StorageConfig) -> Result<Stores, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory storage");
                Ok(Stores::in_memory(InMemoryStore::new()))
            }
            StorageConfig::Postgres(pg_config) => {
                let pool = connect_pool(pg_config).await?;
                let applied = run_migrations(&pool).await?;
                info!(applied, "Connected to PostgreSQL");

                Ok(Stores::from_backend(Arc::new(PostgresStore::new(pool))))
            }
        }
    }
}
