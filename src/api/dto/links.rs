//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Absolute HTTP(S) URL; stored exactly as given.
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

/// A newly created short link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

/// One row of the owner's link listing.
#[derive(Debug, Serialize)]
pub struct LinkListItem {
    pub id: i64,
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
}
