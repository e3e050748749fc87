//! Login and refresh flows.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use agencydesk_core::config::AuthConfig;
use agencydesk_core::error::AppError;
use agencydesk_database::store::UserStore;
use agencydesk_entity::user::{Principal, User};

use crate::error::AuthError;
use crate::jwt::{Claims, JwtDecoder, JwtEncoder, TokenPair};
use crate::password::PasswordHasher;

/// Result of a successful login or refresh.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub tokens: TokenPair,
    /// The account as stored at the time of issuing.
    pub user: User,
}

/// Stateless session/token authority.
///
/// Owns no session records: a session exists only as the token pair held by
/// the client. The user store is consulted for credentials and for a fresh
/// principal-status check.
#[derive(Clone)]
pub struct SessionAuthority {
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
    hasher: Arc<PasswordHasher>,
    users: Arc<dyn UserStore>,
    /// Argon2id hash verified when the email is unknown, so both login
    /// failures cost one full verification.
    dummy_hash: Arc<str>,
}

impl std::fmt::Debug for SessionAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAuthority")
            .field("encoder", &self.encoder)
            .field("decoder", &self.decoder)
            .finish()
    }
}

impl SessionAuthority {
    /// Builds the authority from resolved configuration.
    pub fn new(config: &AuthConfig, users: Arc<dyn UserStore>) -> Result<Self, AppError> {
        let hasher = PasswordHasher::new(config)?;
        let dummy_hash = hasher.hash_password("agencydesk-unknown-account")?;
        Ok(Self {
            encoder: Arc::new(JwtEncoder::new(config)),
            decoder: Arc::new(JwtDecoder::new(config)),
            hasher: Arc::new(hasher),
            users,
            dummy_hash: dummy_hash.into(),
        })
    }

    pub fn encoder(&self) -> &JwtEncoder {
        &self.encoder
    }

    pub fn decoder(&self) -> &JwtDecoder {
        &self.decoder
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    pub fn issue_tokens(&self, principal: &Principal) -> Result<TokenPair, AuthError> {
        Ok(self.encoder.issue_tokens(principal)?)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.decoder.verify_access_token(token)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.decoder.verify_refresh_token(token)
    }

    /// Authenticates with email and password.
    ///
    /// An unknown email and a wrong password both yield
    /// [`AuthError::InvalidCredentials`] after one password verification
    /// each, so neither the error nor the timing separates them. A
    /// deactivated account is only reported as
    /// [`AuthError::PrincipalInactive`] once its password has verified.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let email = email.trim();
        let Some(mut user) = self.users.find_by_email(email).await? else {
            self.verify_stored(None, password).await?;
            warn!(email = %email, "Login failed: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify_stored(Some(&user.password_hash), password).await? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            warn!(user_id = %user.id, "Login refused: account deactivated");
            return Err(AuthError::PrincipalInactive);
        }

        if self.hasher.needs_rehash(&user.password_hash) {
            self.upgrade_hash(&mut user, password).await;
        }

        let now = Utc::now();
        if let Err(e) = self.users.record_login(user.id, now).await {
            warn!(user_id = %user.id, error = %e, "Failed to record last login");
        }
        user.last_login_at = Some(now);

        let tokens = self.issue_tokens(&user.principal())?;
        info!(
            user_id = %user.id,
            email = %user.email,
            role = %user.role,
            "Login successful"
        );
        Ok(LoginOutcome { tokens, user })
    }

    /// Exchanges a refresh token for a completely new pair.
    ///
    /// The principal is reloaded, so role changes and deactivation take
    /// effect here. The old refresh token stays valid until its own expiry.
    pub async fn refresh(&self, refresh_token: &str) -> Result<LoginOutcome, AuthError> {
        let claims = self.decoder.verify_refresh_token(refresh_token)?;
        let user = self.load_active(claims.user_id).await?;

        let tokens = self.issue_tokens(&user.principal())?;
        info!(user_id = %user.id, role = %user.role, "Session refreshed");
        Ok(LoginOutcome { tokens, user })
    }

    /// Fresh status check for the principal behind verified `claims`.
    pub async fn current_principal(&self, claims: &Claims) -> Result<User, AuthError> {
        self.load_active(claims.user_id).await
    }

    /// Verifies `password` against `stored`, or against the dummy hash when
    /// there is no account. The dummy never counts as a match.
    async fn verify_stored(&self, stored: Option<&str>, password: &str) -> Result<bool, AppError> {
        let hash = stored.unwrap_or(&*self.dummy_hash).to_string();
        let valid = self
            .hasher
            .verify_password_blocking(password.to_string(), hash)
            .await?;
        Ok(valid && stored.is_some())
    }

    async fn load_active(&self, user_id: i64) -> Result<User, AuthError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::PrincipalNotFound)?;
        if !user.is_active {
            return Err(AuthError::PrincipalInactive);
        }
        Ok(user)
    }

    /// Replaces a legacy hash after a successful login. Failure is logged and
    /// otherwise ignored; the old hash keeps working.
    async fn upgrade_hash(&self, user: &mut User, password: &str) {
        let upgraded = match self.hasher.hash_password_blocking(password.to_string()).await {
            Ok(hash) => hash,
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Password rehash failed");
                return;
            }
        };
        match self.users.update_password(user.id, &upgraded).await {
            Ok(()) => {
                info!(user_id = %user.id, "Upgraded legacy password hash to Argon2id");
                user.password_hash = upgraded;
            }
            Err(e) => warn!(user_id = %user.id, error = %e, "Failed to store upgraded hash"),
        }
    }
}
