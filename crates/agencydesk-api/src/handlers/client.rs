//! Client record handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use agencydesk_entity::client::{Client, ClientPatch, NewClient};

use crate::dto::request::AssigneesRequest;
use crate::dto::response::{ApiResponse, PaginatedResponse};
use crate::error::ApiError;
use crate::extractors::{ApiJson, AuthUser, ClientListParams, Id};
use crate::state::AppState;

type ClientJson = Json<ApiResponse<Client>>;

/// GET /api/clients
pub async fn list_clients(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ClientListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<Client>>>, ApiError> {
    let page = state
        .client_service
        .list(&auth, params.include_archived, params.page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page.into())))
}

/// POST /api/clients
pub async fn create_client(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<NewClient>,
) -> Result<(StatusCode, ClientJson), ApiError> {
    let client = state.client_service.create(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(client))))
}

/// GET /api/clients/{id}
pub async fn get_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Id(id): Id,
) -> Result<ClientJson, ApiError> {
    let client = state.client_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(client)))
}

/// PATCH /api/clients/{id}
pub async fn update_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Id(id): Id,
    ApiJson(patch): ApiJson<ClientPatch>,
) -> Result<ClientJson, ApiError> {
    let client = state.client_service.update(&auth, id, patch).await?;
    Ok(Json(ApiResponse::ok(client)))
}

/// PUT /api/clients/{id}/assignees
pub async fn set_assignees(
    State(state): State<AppState>,
    auth: AuthUser,
    Id(id): Id,
    ApiJson(req): ApiJson<AssigneesRequest>,
) -> Result<ClientJson, ApiError> {
    let client = state
        .client_service
        .set_assignees(&auth, id, req.user_ids)
        .await?;
    Ok(Json(ApiResponse::ok(client)))
}

/// POST /api/clients/{id}/archive
pub async fn archive_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Id(id): Id,
) -> Result<ClientJson, ApiError> {
    let client = state.client_service.archive(&auth, id).await?;
    Ok(Json(ApiResponse::ok(client)))
}

/// POST /api/clients/{id}/unarchive
pub async fn unarchive_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Id(id): Id,
) -> Result<ClientJson, ApiError> {
    let client = state.client_service.unarchive(&auth, id).await?;
    Ok(Json(ApiResponse::ok(client)))
}

/// DELETE /api/clients/{id}
pub async fn delete_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Id(id): Id,
) -> Result<StatusCode, ApiError> {
    state.client_service.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
