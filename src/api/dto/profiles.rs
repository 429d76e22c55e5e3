//! DTOs for public profile pages.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub links: Vec<ProfileLink>,
}

/// A link as shown to anonymous visitors. Owner and click data stay private.
#[derive(Debug, Serialize)]
pub struct ProfileLink {
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}
