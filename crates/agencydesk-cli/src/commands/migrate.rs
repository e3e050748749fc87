//! Database migration management commands.

use clap::{Args, Subcommand};

use agencydesk_core::config::AppConfig;
use agencydesk_core::error::AppError;
use agencydesk_database::migration::run_migrations;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<MigrateCommand>,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    let db = super::create_db_pool(config).await?;

    match args.command.as_ref().unwrap_or(&MigrateCommand::Run) {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            run_migrations(db.pool()).await?;
            output::print_success("All migrations applied successfully.");
        }
    }

    db.close().await;
    Ok(())
}
