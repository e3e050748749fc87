//! Argon2id password hashing, with verification of legacy bcrypt hashes.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use agencydesk_core::config::AuthConfig;
use agencydesk_core::error::AppError;

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// Hashes new passwords with Argon2id and verifies both Argon2 and bcrypt
/// hashes. Comparison is constant-time inside each primitive.
///
/// Hashing is CPU-bound; async callers should use the `*_blocking`
/// variants, which move the work onto the blocking thread pool.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Creates a hasher with the configured Argon2id cost.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let params = Params::new(
            config.argon2_memory_kib,
            config.argon2_iterations,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| AppError::configuration(format!("Invalid Argon2 parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a plaintext password with a random salt (PHC string format).
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    /// Returns `Ok(true)` on match, `Ok(false)` on mismatch, and an error only
    /// when the stored hash itself is unreadable.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        if is_legacy_bcrypt(hash) {
            return bcrypt::verify(password, hash)
                .map_err(|e| AppError::internal(format!("Invalid bcrypt hash: {e}")));
        }

        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }

    /// Whether a stored hash should be replaced after a successful login.
    pub fn needs_rehash(&self, hash: &str) -> bool {
        is_legacy_bcrypt(hash) || !hash.starts_with("$argon2id$")
    }

    /// [`Self::hash_password`] on the blocking thread pool.
    pub async fn hash_password_blocking(&self, password: String) -> Result<String, AppError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
    }

    /// [`Self::verify_password`] on the blocking thread pool.
    pub async fn verify_password_blocking(
        &self,
        password: String,
        hash: String,
    ) -> Result<bool, AppError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
    }
}

fn is_legacy_bcrypt(hash: &str) -> bool {
    BCRYPT_PREFIXES.iter().any(|prefix| hash.starts_with(prefix))
}
