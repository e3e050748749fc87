//! Signs access and refresh tokens.

use std::fmt;

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use agencydesk_core::config::AuthConfig;
use agencydesk_core::error::AppError;
use agencydesk_entity::user::Principal;

use super::claims::{Claims, TokenKind};

/// Freshly issued access + refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

/// Creates signed HS256 tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    access_key: EncodingKey,
    refresh_key: EncodingKey,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl_seconds", &self.access_ttl_seconds)
            .field("refresh_ttl_seconds", &self.refresh_ttl_seconds)
            .finish()
    }
}

impl JwtEncoder {
    /// Builds an encoder from resolved auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.jwt_refresh_secret.as_bytes()),
            access_ttl_seconds: config.access_token_ttl_seconds,
            refresh_ttl_seconds: config.refresh_token_ttl_seconds,
        }
    }

    /// Issues a new token pair for `principal`.
    pub fn issue_tokens(&self, principal: &Principal) -> Result<TokenPair, AppError> {
        self.issue_tokens_at(principal, Utc::now().timestamp())
    }

    /// Issues a token pair as if the current time were `now` (epoch seconds).
    pub fn issue_tokens_at(&self, principal: &Principal, now: i64) -> Result<TokenPair, AppError> {
        let access = Claims::for_principal(principal, now, self.access_ttl_seconds);
        let refresh = Claims::for_principal(principal, now, self.refresh_ttl_seconds);

        Ok(TokenPair {
            access_token: self.sign(&access, TokenKind::Access)?,
            refresh_token: self.sign(&refresh, TokenKind::Refresh)?,
            access_expires_at: expiry(&access)?,
            refresh_expires_at: expiry(&refresh)?,
        })
    }

    /// Signs arbitrary claims with the key for `kind`.
    pub fn sign(&self, claims: &Claims, kind: TokenKind) -> Result<String, AppError> {
        let key = match kind {
            TokenKind::Access => &self.access_key,
            TokenKind::Refresh => &self.refresh_key,
        };
        encode(&Header::default(), claims, key)
            .map_err(|e| AppError::internal(format!("Failed to encode {kind} token: {e}")))
    }

    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_seconds
    }

    pub fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl_seconds
    }
}

fn expiry(claims: &Claims) -> Result<DateTime<Utc>, AppError> {
    claims
        .expires_at()
        .ok_or_else(|| AppError::internal("Token expiry is out of range"))
}
