//! Handlers for link management endpoints (create, list, delete).
//!
//! All of them sit behind [`crate::api::middleware::auth::layer`] and act on
//! behalf of the [`AuthUser`] it resolved.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkListItem, LinkResponse};
use crate::api::middleware::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL for the authenticated user.
///
/// # Endpoint
///
/// `POST /links`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "id": 1,
///   "code": "aB3xY9z",
///   "short_url": "http://localhost:3000/aB3xY9z",
///   "original_url": "https://example.com/some/long/path",
///   "created_at": "2026-10-19T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is not an absolute HTTP(S) URL.
pub async fn create_link_handler(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .link_service
        .create_link(user.user_id, &payload.url)
        .await?;

    let short_url = state.link_service.short_url(&link.code);

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse {
            id: link.id,
            code: link.code,
            short_url,
            original_url: link.original_url,
            created_at: link.created_at,
        }),
    ))
}

/// Lists the authenticated user's links, newest first.
///
/// # Endpoint
///
/// `GET /links`
///
/// Each item carries `click_count`. Returns an empty array when the user has
/// no links.
pub async fn list_links_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<LinkListItem>>, AppError> {
    let links = state.link_service.list_links(user.user_id).await?;

    let items = links
        .into_iter()
        .map(|entry| LinkListItem {
            id: entry.link.id,
            short_url: state.link_service.short_url(&entry.link.code),
            code: entry.link.code,
            original_url: entry.link.original_url,
            created_at: entry.link.created_at,
            click_count: entry.click_count,
        })
        .collect();

    Ok(Json(items))
}

/// Deletes one of the authenticated user's links.
///
/// # Endpoint
///
/// `DELETE /links/{id}`
///
/// The code stops resolving immediately. Recorded clicks are kept.
///
/// # Errors
///
/// Returns 400 Bad Request if `id` is not an integer.
/// Returns 404 Not Found if the link does not exist or belongs to another
/// user; the two cases are indistinguishable.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    state.link_service.delete_link(user.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
