//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A short code mapped to its target URL, owned by a user.
///
/// `user_id` is a back-reference only. The code is immutable once assigned
/// and unique across all users.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: i64,
    pub user_id: i64,
    pub code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        user_id: i64,
        code: String,
        original_url: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            code,
            original_url,
            created_at,
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub user_id: i64,
    pub code: String,
    pub original_url: String,
}

/// A link together with the number of clicks recorded for it.
#[derive(Debug, Clone)]
pub struct LinkWithClicks {
    pub link: Link,
    pub click_count: i64,
}
