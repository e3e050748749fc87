//! Shared application state passed to all handlers.

use std::sync::Arc;
use std::time::Instant;

use agencydesk_auth::{PasswordHasher, PasswordValidator, SessionAuthority, SessionResolver};
use agencydesk_core::config::AppConfig;
use agencydesk_core::error::AppError;
use agencydesk_database::DatabasePool;
use agencydesk_database::store::{ClientStore, UserStore};
use agencydesk_service::{AdminUserService, ClientService, UserService};

use crate::cookies::CookiePolicy;

/// Application state shared across all request handlers via Axum's
/// `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL pool, absent when running on the in-memory stores.
    pub db: Option<DatabasePool>,

    /// Token issuing, login and refresh.
    pub authority: SessionAuthority,
    /// Per-request access/refresh resolution.
    pub resolver: SessionResolver,

    pub client_service: Arc<ClientService>,
    pub admin_user_service: Arc<AdminUserService>,
    pub user_service: Arc<UserService>,

    /// Process start, reported by the health endpoint.
    pub started_at: Instant,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("environment", &self.config.environment)
            .field("in_memory", &self.db.is_none())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires the services on top of the given stores.
    ///
    /// `config.auth` must already have its secrets resolved.
    pub fn new(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        clients: Arc<dyn ClientStore>,
        db: Option<DatabasePool>,
    ) -> Result<Self, AppError> {
        let authority = SessionAuthority::new(&config.auth, Arc::clone(&users))?;
        let resolver = SessionResolver::new(authority.clone());

        let hasher = Arc::new(PasswordHasher::new(&config.auth)?);
        let validator = Arc::new(PasswordValidator::new(&config.auth));

        let client_service = Arc::new(ClientService::new(clients, Arc::clone(&users)));
        let admin_user_service = Arc::new(AdminUserService::new(
            Arc::clone(&users),
            Arc::clone(&hasher),
            Arc::clone(&validator),
        ));
        let user_service = Arc::new(UserService::new(users, hasher, validator));

        Ok(Self {
            config: Arc::new(config),
            db,
            authority,
            resolver,
            client_service,
            admin_user_service,
            user_service,
            started_at: Instant::now(),
        })
    }

    /// Cookie flags and lifetimes derived from the environment and token TTLs.
    pub fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy::new(
            self.config.environment.is_production(),
            self.config.auth.access_token_ttl_seconds,
            self.config.auth.refresh_token_ttl_seconds,
        )
    }
}
