//! JWT claims carried by access and refresh tokens.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agencydesk_entity::user::{Principal, Role};

/// Token payload: `{ userId, email, role, iat, exp }`.
///
/// Both token kinds share this shape; they differ only in signing key and
/// lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub email: String,
    pub role: Role,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch. Valid while `now < exp`.
    pub exp: i64,
}

impl Claims {
    /// Claims for `principal` issued at `now` and living `ttl_seconds`.
    pub fn for_principal(principal: &Principal, now: i64, ttl_seconds: i64) -> Self {
        Self {
            user_id: principal.id,
            email: principal.email.clone(),
            role: principal.role,
            iat: now,
            exp: now + ttl_seconds,
        }
    }

    /// Validity is the half-open interval `[iat, exp)`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Which of the two token kinds a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived, signed with the access secret.
    Access,
    /// Long-lived, signed with the refresh secret.
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Access => f.write_str("access"),
            Self::Refresh => f.write_str("refresh"),
        }
    }
}
