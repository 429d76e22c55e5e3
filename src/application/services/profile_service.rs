//! Public profiles: a user's links, looked up by username.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::Link;
use crate::domain::repositories::{LinkRepository, UserRepository};
use crate::error::AppError;

/// A user's public page.
#[derive(Debug, Clone)]
pub struct Profile {
    pub username: String,
    pub links: Vec<Link>,
}

/// Read-only view of accounts that chose a username.
///
/// Accounts without a username have no profile.
pub struct ProfileService<
    U: UserRepository + ?Sized = dyn UserRepository,
    L: LinkRepository + ?Sized = dyn LinkRepository,
> {
    users: Arc<U>,
    links: Arc<L>,
}

impl<U: UserRepository + ?Sized, L: LinkRepository + ?Sized> ProfileService<U, L> {
    pub fn new(users: Arc<U>, links: Arc<L>) -> Self {
        Self { users, links }
    }

    /// Returns the profile for `username` with its links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no account has that username.
    pub async fn get_profile(&self, username: &str) -> Result<Profile, AppError> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or_else(|| {
                AppError::not_found("User not found", json!({ "username": username }))
            })?;

        let links = self.links.list_by_owner(user.id).await?;

        Ok(Profile {
            username: user.username.unwrap_or_default(),
            links,
        })
    }
}
