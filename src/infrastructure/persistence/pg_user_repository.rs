//! PostgreSQL implementation of user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::db_error::unique_violation_constraint;

#[derive(FromRow)]
struct UserRow {
    id: i64,
    email: String,
    username: Option<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User::new(r.id, r.email, r.username, r.password_hash, r.created_at)
    }
}

/// PostgreSQL repository for user accounts.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, username, password_hash, created_at
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .fetch_one(self.pool.as_ref())
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(e) => match unique_violation_constraint(&e).as_deref() {
                Some("users_email_key") => Err(AppError::conflict(
                    "Email is already registered",
                    json!({ "field": "email" }),
                )),
                Some("users_username_key") => Err(AppError::conflict(
                    "Username is already taken",
                    json!({ "field": "username" }),
                )),
                _ => Err(e.into()),
            },
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, username, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, username, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(User::from))
    }
}
