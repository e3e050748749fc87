//! Route definitions for the AgencyDesk HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. Everything
//! except health, login, refresh and logout sits behind the session
//! middleware; the admin routes additionally require ADMIN or above.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};

use agencydesk_entity::user::Role;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and per-route middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    let protected = Router::new()
        .merge(session_routes())
        .merge(client_routes())
        .merge(admin_routes())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_session,
        ));

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(public_auth_routes())
        .merge(protected);

    Router::new()
        .nest("/api", api_routes)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(max_body))
        .with_state(state)
}

/// Credential exchange endpoints that work without a session.
fn public_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
}

/// Endpoints about the caller's own session and account.
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/password", put(handlers::auth::change_password))
}

fn client_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/clients",
            get(handlers::client::list_clients).post(handlers::client::create_client),
        )
        .route(
            "/clients/{id}",
            get(handlers::client::get_client)
                .patch(handlers::client::update_client)
                .delete(handlers::client::delete_client),
        )
        .route(
            "/clients/{id}/assignees",
            put(handlers::client::set_assignees),
        )
        .route(
            "/clients/{id}/archive",
            post(handlers::client::archive_client),
        )
        .route(
            "/clients/{id}/unarchive",
            post(handlers::client::unarchive_client),
        )
}

/// Staff administration, gated to ADMIN+ at the route level.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/users",
            get(handlers::admin::users::list_users).post(handlers::admin::users::create_user),
        )
        .route(
            "/admin/users/{id}",
            get(handlers::admin::users::get_user).patch(handlers::admin::users::update_user),
        )
        .route(
            "/admin/users/{id}/password",
            put(handlers::admin::users::reset_password),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            Role::Admin,
            middleware::rbac::require_role,
        ))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
