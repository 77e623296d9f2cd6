//! Storage infrastructure - In-memory and PostgreSQL stores

mod factory;
mod in_memory;
pub mod migrations;
mod postgres;

pub use factory::{StorageConfig, StorageFactory, StorageType, Stores};
#[cfg(test)]
pub use in_memory::FailurePoint;
pub use in_memory::InMemoryStore;
pub use migrations::{run_migrations, Migration, PostgresMigrator, SCHEMA_MIGRATIONS};
pub use postgres::{connect_pool, PostgresConfig, PostgresStore};
