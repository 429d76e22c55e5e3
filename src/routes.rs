//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET    /{code}`         - Short link redirect (public)
//! - `GET    /health`         - Health check: storage, cache, click recorder (public)
//! - `POST   /auth/register`  - Account creation (public)
//! - `POST   /auth/login`     - Token issuance (public)
//! - `GET    /profiles/{username}` - Public link list (public)
//! - `*      /links[/{id}]`   - Link management (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Authentication** - Bearer token on link management routes
//! - **CORS** - Single configured origin, when set
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds every route with its middleware, without path normalization.
///
/// Integration tests drive this router directly.
pub fn router(state: AppState, cors_origin: Option<HeaderValue>) -> Router {
    let link_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .merge(api::routes::public_routes())
        .merge(link_router)
        .with_state(state);

    if let Some(origin) = cors_origin {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        );
    }

    router.layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `cors_origin` - the one origin allowed to call the API from a browser;
///   `None` disables CORS headers entirely
pub fn app_router(state: AppState, cors_origin: Option<HeaderValue>) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, cors_origin))
}
