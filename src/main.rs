//! AgencyDesk server: client records and staff access for a social media
//! agency.
//!
//! Main entry point that wires the crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use agencydesk_api::AppState;
use agencydesk_core::config::{AppConfig, Environment};
use agencydesk_core::error::AppError;
use agencydesk_database::migration::run_migrations;
use agencydesk_database::store::{ClientStore, UserStore};
use agencydesk_database::{
    ClientRepository, DatabasePool, MemoryClientStore, MemoryUserStore, UserRepository,
};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Loads configuration, starts logging, then resolves the signing secrets.
fn load_configuration() -> Result<AppConfig, AppError> {
    let environment = Environment::from_env()?;
    let mut config = AppConfig::load_unresolved(environment)?;

    init_logging(&config);
    tracing::info!(environment = %environment, "Configuration loaded");

    config.auth.resolve_secrets(environment)?;
    Ok(config)
}

/// Initialize tracing/logging. `RUST_LOG` wins over `logging.level`.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    if config.logging.is_json() {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(false)
            .init();
    } else {
        fmt().pretty().with_env_filter(filter).with_target(true).init();
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting AgencyDesk v{}", env!("CARGO_PKG_VERSION"));

    let state = if config.database.in_memory {
        tracing::warn!("Running on in-memory stores; data is lost on shutdown");
        let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
        let clients: Arc<dyn ClientStore> = Arc::new(MemoryClientStore::new());
        AppState::new(config, users, clients, None)?
    } else {
        let db = DatabasePool::connect(&config.database).await?;
        run_migrations(db.pool()).await?;

        let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(db.pool().clone()));
        let clients: Arc<dyn ClientStore> = Arc::new(ClientRepository::new(db.pool().clone()));
        AppState::new(config, users, clients, Some(db))?
    };

    let seeded = state
        .admin_user_service
        .bootstrap_super_admin(&state.config.bootstrap)
        .await?;
    if seeded.is_none() && state.db.is_none() {
        tracing::warn!(
            "No bootstrap admin configured; set AGENCYDESK__BOOTSTRAP__ADMIN_EMAIL and \
             AGENCYDESK__BOOTSTRAP__ADMIN_PASSWORD to log in to the in-memory stores"
        );
    }

    agencydesk_api::run_server(state).await
}
