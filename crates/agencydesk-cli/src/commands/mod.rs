//! CLI command definitions and dispatch.

pub mod migrate;
pub mod user;

use clap::{Parser, Subcommand};

use agencydesk_core::config::{AppConfig, Environment};
use agencydesk_core::error::AppError;
use agencydesk_database::DatabasePool;

use crate::output::OutputFormat;

/// AgencyDesk: client records and staff access for a social media agency
#[derive(Debug, Parser)]
#[command(name = "agencydesk", version, about, long_about = None)]
pub struct Cli {
    /// Environment whose configuration overlay to load (defaults to AGENCYDESK_ENV)
    #[arg(short, long)]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Staff account management
    User(user::UserArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = load_config(self.env.as_deref())?;
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::User(args) => user::execute(args, &config, self.format).await,
        }
    }
}

/// Helper: load configuration for the selected environment
pub fn load_config(env: Option<&str>) -> Result<AppConfig, AppError> {
    let environment = match env {
        Some(name) => name.parse::<Environment>()?,
        None => Environment::from_env()?,
    };
    AppConfig::load(environment)
}

/// Helper: connect to PostgreSQL, refusing the in-memory demo mode
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    if config.database.in_memory {
        return Err(AppError::configuration(
            "The CLI operates on PostgreSQL; unset AGENCYDESK__DATABASE__IN_MEMORY",
        ));
    }
    DatabasePool::connect(&config.database).await
}
