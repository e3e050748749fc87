//! Verifies access and refresh tokens.

use std::fmt;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use agencydesk_core::config::AuthConfig;

use super::claims::{Claims, TokenKind};
use crate::error::AuthError;

/// Checks signature first, then expiry.
///
/// Expiry is evaluated here rather than by `jsonwebtoken` so that the
/// boundary is exact (no leeway) and so that an expired token is only ever
/// reported as [`AuthError::TokenExpired`] once its signature has been
/// proven valid.
#[derive(Clone)]
pub struct JwtDecoder {
    access_key: DecodingKey,
    refresh_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            access_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.jwt_refresh_secret.as_bytes()),
            validation,
        }
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, TokenKind::Access, Utc::now().timestamp())
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, TokenKind::Refresh, Utc::now().timestamp())
    }

    /// Verifies `token` as `kind` against a fixed clock (epoch seconds).
    pub fn verify_at(&self, token: &str, kind: TokenKind, now: i64) -> Result<Claims, AuthError> {
        let key = match kind {
            TokenKind::Access => &self.access_key,
            TokenKind::Refresh => &self.refresh_key,
        };

        let claims = decode::<Claims>(token, key, &self.validation)
            .map_err(|e| {
                debug!(kind = %kind, error = %e, "Token rejected");
                AuthError::TokenMalformed
            })?
            .claims;

        if claims.is_expired_at(now) {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use agencydesk_entity::user::{Principal, Role};

    use super::*;
    use crate::jwt::JwtEncoder;

    const NOW: i64 = 1_750_000_000;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "access-secret-for-unit-tests-0123456789".into(),
            jwt_refresh_secret: "refresh-secret-for-unit-tests-0123456789".into(),
            ..AuthConfig::default()
        }
    }

    fn principal() -> Principal {
        Principal {
            id: 7,
            email: "a@b.com".into(),
            role: Role::Smm,
            is_active: true,
        }
    }

    fn pair() -> (JwtEncoder, JwtDecoder) {
        let config = config();
        (JwtEncoder::new(&config), JwtDecoder::new(&config))
    }

    #[test]
    fn test_issue_then_verify_roundtrip() {
        let (encoder, decoder) = pair();
        let tokens = encoder.issue_tokens(&principal()).unwrap();

        let access = decoder.verify_access_token(&tokens.access_token).unwrap();
        assert_eq!(access.user_id, 7);
        assert_eq!(access.email, "a@b.com");
        assert_eq!(access.role, Role::Smm);
        assert_eq!(access.exp - access.iat, 3600);

        let refresh = decoder.verify_refresh_token(&tokens.refresh_token).unwrap();
        assert_eq!(refresh.user_id, 7);
        assert_eq!(refresh.exp - refresh.iat, 604_800);
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        let (encoder, decoder) = pair();
        let tokens = encoder.issue_tokens(&principal()).unwrap();

        assert!(matches!(
            decoder.verify_refresh_token(&tokens.access_token),
            Err(AuthError::TokenMalformed)
        ));
        assert!(matches!(
            decoder.verify_access_token(&tokens.refresh_token),
            Err(AuthError::TokenMalformed)
        ));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let (encoder, decoder) = pair();
        let tokens = encoder.issue_tokens_at(&principal(), NOW).unwrap();
        let exp = NOW + 3600;

        assert!(decoder.verify_at(&tokens.access_token, TokenKind::Access, exp - 1).is_ok());
        assert!(matches!(
            decoder.verify_at(&tokens.access_token, TokenKind::Access, exp),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_exp_one_second_ahead_is_valid() {
        let (encoder, decoder) = pair();
        let claims = Claims::for_principal(&principal(), NOW - 10, 11);
        let token = encoder.sign(&claims, TokenKind::Access).unwrap();
        assert_eq!(claims.exp, NOW + 1);
        assert!(decoder.verify_at(&token, TokenKind::Access, NOW).is_ok());

        let at_now = Claims::for_principal(&principal(), NOW - 10, 10);
        let token = encoder.sign(&at_now, TokenKind::Access).unwrap();
        assert!(matches!(
            decoder.verify_at(&token, TokenKind::Access, NOW),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_tampered_expired_token_is_malformed() {
        let (encoder, decoder) = pair();
        let tokens = encoder.issue_tokens_at(&principal(), NOW - 10_000).unwrap();
        let other = Principal {
            role: Role::SuperAdmin,
            ..principal()
        };
        let forged = encoder.issue_tokens_at(&other, NOW - 10_000).unwrap();

        // Escalated payload with the original signature.
        let (_, signature) = tokens.access_token.rsplit_once('.').unwrap();
        let (signed_part, _) = forged.access_token.rsplit_once('.').unwrap();
        let tampered = format!("{signed_part}.{signature}");

        // Signature check wins over expiry.
        assert!(matches!(
            decoder.verify_at(&tampered, TokenKind::Access, NOW),
            Err(AuthError::TokenMalformed)
        ));
        assert!(matches!(
            decoder.verify_at(&tokens.access_token, TokenKind::Access, NOW),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_garbage_and_foreign_key() {
        let (_, decoder) = pair();
        assert!(matches!(
            decoder.verify_access_token("not.a.jwt"),
            Err(AuthError::TokenMalformed)
        ));
        assert!(matches!(
            decoder.verify_access_token(""),
            Err(AuthError::TokenMalformed)
        ));

        let foreign = JwtEncoder::new(&AuthConfig {
            jwt_secret: "some-other-deployment-secret-000000000".into(),
            ..config()
        });
        let tokens = foreign.issue_tokens(&principal()).unwrap();
        assert!(matches!(
            decoder.verify_access_token(&tokens.access_token),
            Err(AuthError::TokenMalformed)
        ));
    }
}
