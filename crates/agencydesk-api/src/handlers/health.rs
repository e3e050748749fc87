//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
///
/// Answers 503 when the database is configured but unreachable.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let (code, database) = match &state.db {
        None => (StatusCode::OK, "in-memory"),
        Some(db) => match db.health_check().await {
            Ok(()) => (StatusCode::OK, "up"),
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                (StatusCode::SERVICE_UNAVAILABLE, "down")
            }
        },
    };

    let status = if code.is_success() { "ok" } else { "degraded" };
    (
        code,
        Json(ApiResponse::ok(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: state.config.environment.to_string(),
            database: database.to_string(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
        })),
    )
}
