//! Session authentication middleware.
//!
//! Resolves the access token (bearer header first, then the `auth-token`
//! cookie) into a [`RequestContext`]. An expired access token is renewed
//! from the `refresh-token` cookie and the new pair is written back as
//! cookies on the response.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use agencydesk_auth::SessionState;
use agencydesk_core::AppError;
use agencydesk_service::RequestContext;

use crate::cookies::{ACCESS_COOKIE, REFRESH_COOKIE, cookie_value};
use crate::error::ApiError;
use crate::state::AppState;

/// Rejects the request with 401 unless a session can be established.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let access = bearer_token(request.headers()).or_else(|| cookie_value(&jar, ACCESS_COOKIE));
    let refresh = cookie_value(&jar, REFRESH_COOKIE);

    let session = state
        .resolver
        .resolve(access.as_deref(), refresh.as_deref())
        .await?;

    match session {
        SessionState::Unauthenticated => {
            Err(AppError::unauthorized("Authentication required").into())
        }
        SessionState::Authenticated { user, .. } => {
            request
                .extensions_mut()
                .insert(RequestContext::from_user(&user));
            Ok(next.run(request).await)
        }
        SessionState::Refreshed { user, tokens } => {
            debug!(user_id = %user.id, "Access token renewed from refresh cookie");
            request
                .extensions_mut()
                .insert(RequestContext::from_user(&user));
            let response = next.run(request).await;
            let jar = state.cookie_policy().set_tokens(jar, &tokens);
            Ok((jar, response).into_response())
        }
    }
}

/// Token from `Authorization: Bearer <token>`, if present and non-empty.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
