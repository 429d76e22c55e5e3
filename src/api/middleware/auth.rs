//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// The authenticated caller, inserted into request extensions by [`layer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Authenticates requests using session tokens from the Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract token from `Authorization` header
/// 2. Verify signature, algorithm and expiry
/// 3. Store [`AuthUser`] in request extensions
/// 4. Continue to next middleware/handler
///
/// # Errors
///
/// Returns `401 Unauthorized` before any handler runs if:
/// - Authorization header is missing or not a Bearer credential
/// - Token is malformed, forged or expired
///
/// Adds `WWW-Authenticate: Bearer` header to 401 responses per RFC 6750.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/links", get(list_links_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let user_id = st.token_service.verify(&token)?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(req).await)
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().copied().ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authentication required"}),
            )
        })
    }
}
