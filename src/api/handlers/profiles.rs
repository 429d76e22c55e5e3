//! Handler for public profile pages.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::profiles::{ProfileLink, ProfileResponse};
use crate::error::AppError;
use crate::state::AppState;

pub async fn profile_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state.profile_service.get_profile(&username).await?;

    let links = profile
        .links
        .into_iter()
        .map(|link| ProfileLink {
            short_url: state.link_service.short_url(&link.code),
            code: link.code,
            original_url: link.original_url,
            created_at: link.created_at,
        })
        .collect();

    Ok(Json(ProfileResponse {
        username: profile.username,
        links,
    }))
}
