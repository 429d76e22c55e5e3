//! API route configuration.
//!
//! Link management requires Bearer token authentication via
//! [`crate::api::middleware::auth`]; account endpoints are public.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, list_links_handler, login_handler,
    profile_handler, register_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Account and profile routes, open to anonymous callers.
///
/// # Endpoints
///
/// - `POST /auth/register`        - Create an account
/// - `POST /auth/login`           - Exchange credentials for a session token
/// - `GET  /profiles/{username}`  - A user's public links
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/profiles/{username}", get(profile_handler))
}

/// Link management routes. The caller wraps them in the auth layer.
///
/// # Endpoints
///
/// - `POST   /links`      - Shorten a URL
/// - `GET    /links`      - List own links with click counts
/// - `DELETE /links/{id}` - Delete an own link
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route("/links/{id}", delete(delete_link_handler))
}
