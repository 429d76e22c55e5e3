//! Handlers for account registration and login.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::auth::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates an account.
///
/// # Endpoint
///
/// `POST /auth/register`
///
/// # Request Body
///
/// ```json
/// { "email": "alice@example.com", "password": "password123", "username": "alice" }
/// ```
///
/// `username` is optional.
///
/// # Errors
///
/// Returns 400 Bad Request if the email is malformed or the password is
/// shorter than 8 characters.
/// Returns 409 Conflict if the email or username is already registered.
pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let user = state
        .auth_service
        .register(
            &payload.email,
            &payload.password,
            payload.username.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchanges credentials for a session token.
///
/// # Endpoint
///
/// `POST /auth/login`
///
/// # Response
///
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiJ9...",
///   "token_type": "Bearer",
///   "expires_at": "2026-10-26T12:00:00Z",
///   "user": { "id": 1, "email": "alice@example.com", "username": null, "created_at": "..." }
/// }
/// ```
///
/// # Errors
///
/// Returns 401 Unauthorized with the same body for an unknown email and a
/// wrong password.
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let (user, issued) = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: "Bearer",
        expires_at: issued.expires_at,
        user: user.into(),
    }))
}
