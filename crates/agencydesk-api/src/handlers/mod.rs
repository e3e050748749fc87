//! HTTP request handlers, one module per domain.

pub mod admin;
pub mod auth;
pub mod client;
pub mod health;

use crate::error::ApiError;

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    agencydesk_core::AppError::not_found("No such endpoint").into()
}
