//! Per-request session state machine.
//!
//! ```text
//! Unauthenticated --valid access token--> Authenticated
//! Authenticated --access expired, refresh ok--> Refreshed (new pair issued)
//! Authenticated --access expired, refresh bad--> Unauthenticated
//! ```

use tracing::debug;

use agencydesk_entity::user::User;

use super::authority::SessionAuthority;
use crate::error::AuthError;
use crate::jwt::{Claims, TokenPair};

/// Outcome of resolving the credentials on one request.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// No usable credentials. The request must be rejected or re-login forced.
    Unauthenticated,
    /// A valid access token for an active principal.
    Authenticated { claims: Claims, user: User },
    /// The access token had expired and a fresh pair was issued from the
    /// refresh token. The caller must hand `tokens` back to the client.
    Refreshed { user: User, tokens: TokenPair },
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Unauthenticated => None,
            Self::Authenticated { user, .. } | Self::Refreshed { user, .. } => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Unauthenticated)
    }
}

/// Drives [`SessionState`] transitions for incoming requests.
#[derive(Debug, Clone)]
pub struct SessionResolver {
    authority: SessionAuthority,
}

impl SessionResolver {
    pub fn new(authority: SessionAuthority) -> Self {
        Self { authority }
    }

    /// Resolves the access/refresh tokens presented on a request.
    ///
    /// A token with a bad signature is treated exactly like a missing one.
    /// Only an access token that verified but has expired falls through to
    /// the refresh token. Errors are returned only for store failures.
    pub async fn resolve(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<SessionState, AuthError> {
        let Some(access_token) = access_token else {
            return Ok(SessionState::Unauthenticated);
        };

        match self.authority.verify_access_token(access_token) {
            Ok(claims) => match self.authority.current_principal(&claims).await {
                Ok(user) => Ok(SessionState::Authenticated { claims, user }),
                Err(e) => terminal(e),
            },
            Err(AuthError::TokenExpired) => self.try_refresh(refresh_token).await,
            Err(e) => terminal(e),
        }
    }

    async fn try_refresh(&self, refresh_token: Option<&str>) -> Result<SessionState, AuthError> {
        let Some(refresh_token) = refresh_token else {
            debug!("Access token expired and no refresh token presented");
            return Ok(SessionState::Unauthenticated);
        };

        match self.authority.refresh(refresh_token).await {
            Ok(outcome) => Ok(SessionState::Refreshed {
                user: outcome.user,
                tokens: outcome.tokens,
            }),
            Err(e) => terminal(e),
        }
    }
}

fn terminal(err: AuthError) -> Result<SessionState, AuthError> {
    match err {
        AuthError::Internal(_) => Err(err),
        other => {
            debug!(reason = other.code(), "Session not established");
            Ok(SessionState::Unauthenticated)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use agencydesk_core::config::AuthConfig;
    use agencydesk_database::memory::MemoryUserStore;
    use agencydesk_database::store::UserStore;
    use agencydesk_entity::user::{NewUser, Role, UserPatch};

    use super::*;
    use crate::jwt::TokenKind;

    struct Fixture {
        resolver: SessionResolver,
        authority: SessionAuthority,
        store: Arc<MemoryUserStore>,
        user: User,
    }

    async fn fixture() -> Fixture {
        let config = AuthConfig {
            jwt_secret: "access-secret-for-unit-tests-0123456789".into(),
            jwt_refresh_secret: "refresh-secret-for-unit-tests-0123456789".into(),
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            ..AuthConfig::default()
        };
        let store = Arc::new(MemoryUserStore::new());
        let authority = SessionAuthority::new(&config, store.clone()).unwrap();
        let user = store
            .create(&NewUser {
                email: "smm@agency.test".into(),
                name: "Sam".into(),
                password_hash: "unused".into(),
                role: Role::Smm,
            })
            .await
            .unwrap();
        Fixture {
            resolver: SessionResolver::new(authority.clone()),
            authority,
            store,
            user,
        }
    }

    fn expired_access(f: &Fixture) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims::for_principal(&f.user.principal(), now - 7200, 3600);
        f.authority
            .encoder()
            .sign(&claims, TokenKind::Access)
            .unwrap()
    }

    #[tokio::test]
    async fn test_no_token_is_unauthenticated() {
        let f = fixture().await;
        let state = f.resolver.resolve(None, None).await.unwrap();
        assert!(!state.is_authenticated());
    }

    #[tokio::test]
    async fn test_valid_access_token() {
        let f = fixture().await;
        let tokens = f.authority.issue_tokens(&f.user.principal()).unwrap();
        let state = f
            .resolver
            .resolve(Some(&tokens.access_token), None)
            .await
            .unwrap();
        match state {
            SessionState::Authenticated { claims, user } => {
                assert_eq!(claims.user_id, f.user.id);
                assert_eq!(user.email, "smm@agency.test");
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_expired_access_refreshes() {
        let f = fixture().await;
        let tokens = f.authority.issue_tokens(&f.user.principal()).unwrap();
        let expired = expired_access(&f);

        let state = f
            .resolver
            .resolve(Some(&expired), Some(&tokens.refresh_token))
            .await
            .unwrap();
        match state {
            SessionState::Refreshed { user, tokens } => {
                assert_eq!(user.id, f.user.id);
                assert!(f.authority.verify_access_token(&tokens.access_token).is_ok());
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_expired_access_without_valid_refresh() {
        let f = fixture().await;
        let expired = expired_access(&f);

        let state = f.resolver.resolve(Some(&expired), None).await.unwrap();
        assert!(!state.is_authenticated());

        let state = f
            .resolver
            .resolve(Some(&expired), Some(&expired))
            .await
            .unwrap();
        assert!(!state.is_authenticated());
    }

    #[tokio::test]
    async fn test_forged_access_does_not_fall_through_to_refresh() {
        let f = fixture().await;
        let tokens = f.authority.issue_tokens(&f.user.principal()).unwrap();

        let state = f
            .resolver
            .resolve(Some("garbage.token.value"), Some(&tokens.refresh_token))
            .await
            .unwrap();
        assert!(!state.is_authenticated());

        // A refresh token in the access slot is equally unusable.
        let state = f
            .resolver
            .resolve(Some(&tokens.refresh_token), Some(&tokens.refresh_token))
            .await
            .unwrap();
        assert!(!state.is_authenticated());
    }

    #[tokio::test]
    async fn test_deactivated_principal_is_rejected() {
        let f = fixture().await;
        let tokens = f.authority.issue_tokens(&f.user.principal()).unwrap();
        let patch = UserPatch {
            is_active: Some(false),
            ..UserPatch::default()
        };
        f.store.update(f.user.id, &patch).await.unwrap();

        let state = f
            .resolver
            .resolve(Some(&tokens.access_token), Some(&tokens.refresh_token))
            .await
            .unwrap();
        assert!(state.user().is_none());
    }
}
