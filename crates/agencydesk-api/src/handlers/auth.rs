//! Auth handlers: login, refresh, logout, me, password change.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use tracing::info;
use validator::Validate;

use agencydesk_core::AppError;

use crate::cookies::{REFRESH_COOKIE, cookie_value};
use crate::dto::request::{ChangePasswordRequest, LoginRequest, RefreshRequest};
use crate::dto::response::{ApiResponse, MessageResponse, SessionResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{ApiJson, AuthUser};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<SessionResponse>>), ApiError> {
    req.validate()?;

    let outcome = state.authority.login(&req.email, &req.password).await?;
    let jar = state.cookie_policy().set_tokens(jar, &outcome.tokens);

    Ok((
        jar,
        Json(ApiResponse::ok(SessionResponse {
            tokens: outcome.tokens,
            user: outcome.user.into(),
        })),
    ))
}

/// POST /api/auth/refresh
///
/// Takes the refresh token from a `{"refreshToken": ...}` body, falling back
/// to the `refresh-token` cookie. Issues a full new pair.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(CookieJar, Json<ApiResponse<SessionResponse>>), ApiError> {
    let from_body = if body.iter().all(u8::is_ascii_whitespace) {
        RefreshRequest::default()
    } else {
        serde_json::from_slice::<RefreshRequest>(&body)
            .map_err(|e| AppError::validation(format!("Invalid refresh request: {e}")))?
    };

    let token = from_body
        .refresh_token
        .filter(|t| !t.is_empty())
        .or_else(|| cookie_value(&jar, REFRESH_COOKIE))
        .ok_or_else(|| AppError::unauthorized("Refresh token required"))?;

    let outcome = state.authority.refresh(&token).await?;
    let jar = state.cookie_policy().set_tokens(jar, &outcome.tokens);

    Ok((
        jar,
        Json(ApiResponse::ok(SessionResponse {
            tokens: outcome.tokens,
            user: outcome.user.into(),
        })),
    ))
}

/// POST /api/auth/logout
///
/// Clears the session cookies. Tokens already handed out stay valid until
/// they expire.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<MessageResponse>>) {
    let jar = state.cookie_policy().clear_tokens(jar);
    (
        jar,
        Json(ApiResponse::ok(MessageResponse::new("Logged out"))),
    )
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.user_service.get_profile(&auth).await?;

    Ok((
        [(header::CACHE_CONTROL, "private, no-store")],
        Json(ApiResponse::ok(UserResponse::from(user))),
    ))
}

/// PUT /api/auth/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    req.validate()?;

    state
        .user_service
        .change_password(&auth, req.current_password, req.new_password)
        .await?;

    info!(user_id = %auth.user_id, "Password changed via API");
    Ok(Json(ApiResponse::ok(MessageResponse::new("Password changed"))))
}
