//! In-memory user repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

#[derive(Default)]
struct UserTable {
    next_id: i64,
    rows: BTreeMap<i64, User>,
}

/// User store backed by a mutex-guarded map.
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: Mutex<UserTable>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut table = self.table.lock().await;

        if table.rows.values().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict(
                "Email is already registered",
                json!({ "field": "email" }),
            ));
        }

        if let Some(username) = &new_user.username
            && table
                .rows
                .values()
                .any(|u| u.username.as_deref() == Some(username.as_str()))
        {
            return Err(AppError::conflict(
                "Username is already taken",
                json!({ "field": "username" }),
            ));
        }

        table.next_id += 1;
        let user = User::new(
            table.next_id,
            new_user.email,
            new_user.username,
            new_user.password_hash,
            Utc::now(),
        );
        table.rows.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let table = self.table.lock().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .find(|u| u.username.as_deref() == Some(username))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let table = self.table.lock().await;
        Ok(table.rows.get(&id).cloned())
    }
}
