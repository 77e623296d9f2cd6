//! Migrate command - applies the embedded schema to PostgreSQL

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::storage::{connect_pool, run_migrations, PostgresMigrator};

/// Arguments for the migrate command
#[derive(Args, Clone, Debug, Default)]
pub struct MigrateArgs {
    /// Print the applied schema version without migrating
    #[arg(long)]
    pub status: bool,
}

pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging);

    let pool = connect_pool(&config.database.to_postgres_config()).await?;

    if !args.status {
        let applied = run_migrations(&pool).await?;
        info!(applied, "Migrations complete");
    }

    let version = PostgresMigrator::new(pool.clone()).current_version().await?;
    match version {
        Some(version) => info!(version, "Schema version"),
        None => info!("No migrations applied"),
    }

    pool.close().await;
    Ok(())
}
