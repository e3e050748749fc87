//! Authentication failure taxonomy.

use thiserror::Error;

use agencydesk_core::error::{AppError, ErrorKind};
use agencydesk_entity::user::Role;

/// Why an authentication or authorization step failed.
///
/// Only [`AuthError::TokenExpired`] on an access token is recoverable (by
/// presenting a refresh token); every other variant ends the request.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token's signature is valid but `exp <= now`.
    #[error("Token has expired")]
    TokenExpired,

    /// Bad signature, wrong key, or unparseable token.
    #[error("Token is malformed or its signature is invalid")]
    TokenMalformed,

    #[error("Role {actual} is insufficient; {required} or higher is required")]
    InsufficientRole { actual: Role, required: Role },

    #[error("Account is deactivated")]
    PrincipalInactive,

    /// The token refers to a user id that no longer exists.
    #[error("Account no longer exists")]
    PrincipalNotFound,

    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Store or hashing failure unrelated to the caller's credentials.
    #[error(transparent)]
    Internal(#[from] AppError),
}

impl AuthError {
    /// Machine-readable code, also used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenMalformed => "TOKEN_MALFORMED",
            Self::InsufficientRole { .. } => "INSUFFICIENT_ROLE",
            Self::PrincipalInactive => "PRINCIPAL_INACTIVE",
            Self::PrincipalNotFound => "PRINCIPAL_NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(inner) => inner,
            AuthError::InsufficientRole { .. } => AppError::new(ErrorKind::Forbidden, err.to_string()),
            other => AppError::new(ErrorKind::Unauthorized, other.to_string()),
        }
    }
}
