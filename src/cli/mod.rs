//! CLI module for Squad Market
//!
//! Subcommands:
//! - `serve`: run the HTTP API
//! - `migrate`: apply the database schema

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Squad Market - team rosters and a player transfer market
#[derive(Parser)]
#[command(name = "squad-market")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve(serve::ServeArgs),

    /// Apply pending schema migrations to PostgreSQL
    Migrate(migrate::MigrateArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from(["squad-market", "serve", "--port", "9000", "--memory"]).unwrap();

        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, Some(9000));
                assert!(args.memory);
            }
            Command::Migrate(_) => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_migrate_status() {
        let cli = Cli::try_parse_from(["squad-market", "migrate", "--status"]).unwrap();
        assert!(matches!(cli.command, Command::Migrate(args) if args.status));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["squad-market"]).is_err());
    }
}
