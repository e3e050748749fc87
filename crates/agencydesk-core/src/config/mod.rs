//! Application configuration schemas.
//!
//! Configuration is deserialized from TOML files via the `config` crate
//! (`config/default.toml` plus an environment overlay) and environment
//! variables prefixed with `AGENCYDESK__`. The token signing secrets are
//! additionally read from `JWT_SECRET` and `JWT_REFRESH_SECRET`.

pub mod app;
pub mod auth;
pub mod bootstrap;
pub mod database;
pub mod logging;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::bootstrap::BootstrapConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::{LogFormat, LoggingConfig};

use crate::error::AppError;

/// Deployment environment the process runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development. Insecure fallbacks are tolerated with a warning.
    #[default]
    Development,
    /// Automated test runs.
    Test,
    /// Production deployment.
    Production,
}

impl Environment {
    /// Reads `AGENCYDESK_ENV`, defaulting to development.
    pub fn from_env() -> Result<Self, AppError> {
        match std::env::var("AGENCYDESK_ENV") {
            Ok(value) => value.parse(),
            Err(_) => Ok(Self::Development),
        }
    }

    /// Whether this is the development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Whether this is the production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Lowercase name, also used as the overlay file name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(AppError::configuration(format!(
                "Unknown environment '{other}'. Expected one of: development, test, production"
            ))),
        }
    }
}

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Environment the configuration was loaded for.
    #[serde(default)]
    pub environment: Environment,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token and password settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// First SUPER_ADMIN for an empty user store.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

impl AppConfig {
    /// Load configuration for the given environment.
    ///
    /// Merges `config/default`, `config/{env}`, and `AGENCYDESK__*`
    /// variables, applies `JWT_SECRET`/`JWT_REFRESH_SECRET`, then resolves
    /// the signing secrets. Outside development a missing secret is a hard
    /// error.
    pub fn load(environment: Environment) -> Result<Self, AppError> {
        let mut app = Self::load_unresolved(environment)?;
        app.auth.resolve_secrets(environment)?;
        Ok(app)
    }

    /// Like [`AppConfig::load`] but leaves secret resolution to the caller,
    /// so logging can be initialised before the development fallbacks warn.
    pub fn load_unresolved(environment: Environment) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::File::with_name(&format!("config/{}", environment.as_str()))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("AGENCYDESK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let mut app: AppConfig = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        app.environment = environment;
        app.auth.apply_env_secrets(|key| std::env::var(key).ok());
        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!(
            " Development ".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_defaults_deserialize_from_empty_source() {
        let config = config::Config::builder().build().unwrap();
        let app: AppConfig = config.try_deserialize().unwrap();
        assert_eq!(app.environment, Environment::Development);
        assert_eq!(app.server.port, 8080);
        assert_eq!(app.auth.access_token_ttl_seconds, 3600);
        assert_eq!(app.auth.refresh_token_ttl_seconds, 604_800);
        assert!(app.auth.jwt_secret.is_empty());
    }
}
