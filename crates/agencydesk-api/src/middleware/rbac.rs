//! Route-level role gate.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use agencydesk_entity::user::Role;
use agencydesk_service::RequestContext;

use crate::error::ApiError;

/// Rejects requests whose actor ranks below the role held as layer state.
///
/// Must run after [`super::auth::require_session`], which inserts the
/// [`RequestContext`].
///
/// ```ignore
/// router.route_layer(axum::middleware::from_fn_with_state(Role::Admin, require_role));
/// ```
pub async fn require_role(
    State(required): State<Role>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx = request
        .extensions()
        .get::<RequestContext>()
        .ok_or_else(|| agencydesk_core::AppError::unauthorized("Authentication required"))?;

    ctx.require_role(required)?;
    Ok(next.run(request).await)
}
