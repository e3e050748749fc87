//! Staff account administration.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use validator::Validate;

use agencydesk_entity::user::UserPatch;

use crate::dto::request::{CreateUserBody, ResetPasswordRequest};
use crate::dto::response::{ApiResponse, MessageResponse, PaginatedResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{ApiJson, AuthUser, Id, PaginationParams};
use crate::state::AppState;

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<UserResponse>>>, ApiError> {
    let page = state
        .admin_user_service
        .list_users(&auth, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page.map(UserResponse::from).into())))
}

/// POST /api/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<CreateUserBody>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    body.validate()?;
    let user = state
        .admin_user_service
        .create_user(&auth, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user.into()))))
}

/// GET /api/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Id(id): Id,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.admin_user_service.get_user(&auth, id).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PATCH /api/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Id(id): Id,
    ApiJson(patch): ApiJson<UserPatch>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.admin_user_service.update_user(&auth, id, patch).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/admin/users/{id}/password
pub async fn reset_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Id(id): Id,
    ApiJson(req): ApiJson<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    req.validate()?;
    state
        .admin_user_service
        .reset_password(&auth, id, req.password)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Password reset"))))
}
