//! Authentication configuration: token secrets, lifetimes, and hashing cost.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Environment;
use crate::error::AppError;

/// Environment variable holding the access-token signing key.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
/// Environment variable holding the refresh-token signing key.
pub const JWT_REFRESH_SECRET_ENV: &str = "JWT_REFRESH_SECRET";

/// Minimum secret length accepted outside development.
pub const MIN_SECRET_LENGTH: usize = 32;

const DEV_ACCESS_SECRET: &str = "agencydesk-insecure-dev-access-secret";
const DEV_REFRESH_SECRET: &str = "agencydesk-insecure-dev-refresh-secret";

/// Authentication and credential configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC-SHA256 key for access tokens. Empty means unset.
    #[serde(default, skip_serializing)]
    pub jwt_secret: String,
    /// HMAC-SHA256 key for refresh tokens. Must differ from `jwt_secret`.
    #[serde(default, skip_serializing)]
    pub jwt_refresh_secret: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_seconds: i64,
    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_seconds: i64,
    /// Argon2id memory cost in KiB.
    #[serde(default = "default_argon2_memory")]
    pub argon2_memory_kib: u32,
    /// Argon2id iteration count.
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
    /// Argon2id degree of parallelism.
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
    /// Minimum password length for new passwords.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_refresh_secret: String::new(),
            access_token_ttl_seconds: default_access_ttl(),
            refresh_token_ttl_seconds: default_refresh_ttl(),
            argon2_memory_kib: default_argon2_memory(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            password_min_length: default_password_min(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &redacted(&self.jwt_secret))
            .field("jwt_refresh_secret", &redacted(&self.jwt_refresh_secret))
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("refresh_token_ttl_seconds", &self.refresh_token_ttl_seconds)
            .field("argon2_memory_kib", &self.argon2_memory_kib)
            .field("argon2_iterations", &self.argon2_iterations)
            .field("argon2_parallelism", &self.argon2_parallelism)
            .field("password_min_length", &self.password_min_length)
            .finish()
    }
}

impl AuthConfig {
    /// Overrides the secrets from `JWT_SECRET` / `JWT_REFRESH_SECRET`.
    ///
    /// `lookup` abstracts the process environment. Empty values are ignored.
    pub fn apply_env_secrets(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(secret) = lookup(JWT_SECRET_ENV).filter(|s| !s.is_empty()) {
            self.jwt_secret = secret;
        }
        if let Some(secret) = lookup(JWT_REFRESH_SECRET_ENV).filter(|s| !s.is_empty()) {
            self.jwt_refresh_secret = secret;
        }
    }

    /// Fills in or rejects missing signing secrets.
    ///
    /// In development an unset secret is replaced with a well-known insecure
    /// constant and a warning is logged. Any other environment refuses to
    /// start without both secrets, with secrets shorter than
    /// [`MIN_SECRET_LENGTH`], or with identical access and refresh secrets.
    pub fn resolve_secrets(&mut self, environment: Environment) -> Result<(), AppError> {
        if environment.is_development() {
            if self.jwt_secret.is_empty() {
                warn!(
                    "{JWT_SECRET_ENV} is not set; signing access tokens with an insecure development key"
                );
                self.jwt_secret = DEV_ACCESS_SECRET.to_string();
            }
            if self.jwt_refresh_secret.is_empty() {
                warn!(
                    "{JWT_REFRESH_SECRET_ENV} is not set; signing refresh tokens with an insecure development key"
                );
                self.jwt_refresh_secret = DEV_REFRESH_SECRET.to_string();
            }
        } else {
            require_secret(JWT_SECRET_ENV, &self.jwt_secret, environment)?;
            require_secret(JWT_REFRESH_SECRET_ENV, &self.jwt_refresh_secret, environment)?;
        }

        if self.jwt_secret == self.jwt_refresh_secret {
            return Err(AppError::configuration(format!(
                "{JWT_SECRET_ENV} and {JWT_REFRESH_SECRET_ENV} must be different"
            )));
        }

        if self.access_token_ttl_seconds <= 0 || self.refresh_token_ttl_seconds <= 0 {
            return Err(AppError::configuration("Token lifetimes must be positive"));
        }

        Ok(())
    }
}

fn require_secret(name: &str, value: &str, environment: Environment) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::configuration(format!(
            "{name} must be set when running in {environment}"
        )));
    }
    if value.len() < MIN_SECRET_LENGTH {
        return Err(AppError::configuration(format!(
            "{name} must be at least {MIN_SECRET_LENGTH} bytes when running in {environment}"
        )));
    }
    Ok(())
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

fn default_access_ttl() -> i64 {
    3600
}

fn default_refresh_ttl() -> i64 {
    7 * 24 * 3600
}

fn default_argon2_memory() -> u32 {
    19 * 1024
}

fn default_argon2_iterations() -> u32 {
    2
}

fn default_argon2_parallelism() -> u32 {
    1
}

fn default_password_min() -> usize {
    8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const ACCESS: &str = "0123456789abcdef0123456789abcdef-access";
    const REFRESH: &str = "0123456789abcdef0123456789abcdef-refresh";

    fn env_with(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_production_refuses_missing_secret() {
        let mut config = AuthConfig::default();
        config.apply_env_secrets(env_with(&[(JWT_SECRET_ENV, ACCESS)]));

        let err = config.resolve_secrets(Environment::Production).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        assert!(err.message.contains(JWT_REFRESH_SECRET_ENV));
    }

    #[test]
    fn test_test_environment_also_fails_closed() {
        let mut config = AuthConfig::default();
        assert!(config.resolve_secrets(Environment::Test).is_err());
    }

    #[test]
    fn test_production_accepts_distinct_secrets() {
        let mut config = AuthConfig::default();
        config.apply_env_secrets(env_with(&[
            (JWT_SECRET_ENV, ACCESS),
            (JWT_REFRESH_SECRET_ENV, REFRESH),
        ]));
        config.resolve_secrets(Environment::Production).unwrap();
        assert_eq!(config.jwt_secret, ACCESS);
        assert_eq!(config.jwt_refresh_secret, REFRESH);
    }

    #[test]
    fn test_short_secret_rejected_outside_development() {
        let mut config = AuthConfig {
            jwt_secret: "short".into(),
            jwt_refresh_secret: REFRESH.into(),
            ..AuthConfig::default()
        };
        assert!(config.resolve_secrets(Environment::Production).is_err());
    }

    #[test]
    fn test_identical_secrets_rejected() {
        let mut config = AuthConfig {
            jwt_secret: ACCESS.into(),
            jwt_refresh_secret: ACCESS.into(),
            ..AuthConfig::default()
        };
        let err = config.resolve_secrets(Environment::Development).unwrap_err();
        assert!(err.message.contains("must be different"));
    }

    #[test]
    fn test_development_uses_distinct_fallbacks() {
        let mut config = AuthConfig::default();
        config.resolve_secrets(Environment::Development).unwrap();
        assert!(!config.jwt_secret.is_empty());
        assert_ne!(config.jwt_secret, config.jwt_refresh_secret);
    }

    #[test]
    fn test_empty_env_value_is_ignored() {
        let mut config = AuthConfig {
            jwt_secret: ACCESS.into(),
            ..AuthConfig::default()
        };
        config.apply_env_secrets(env_with(&[(JWT_SECRET_ENV, "")]));
        assert_eq!(config.jwt_secret, ACCESS);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AuthConfig {
            jwt_secret: ACCESS.into(),
            ..AuthConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains(ACCESS));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("<unset>"));
    }
}
