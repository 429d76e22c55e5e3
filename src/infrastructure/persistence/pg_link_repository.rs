//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::db_error::unique_violation_constraint;

/// Name of the unique constraint on `links.code`.
const CODE_CONSTRAINT: &str = "links_code_key";

#[derive(FromRow)]
struct LinkRow {
    id: i64,
    user_id: i64,
    code: String,
    original_url: String,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(r.id, r.user_id, r.code, r.original_url, r.created_at)
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Code uniqueness is enforced by the `links_code_key` constraint, so two
/// concurrent inserts of the same code cannot both succeed.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let result = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (user_id, code, original_url)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, code, original_url, created_at
            "#,
        )
        .bind(new_link.user_id)
        .bind(&new_link.code)
        .bind(&new_link.original_url)
        .fetch_one(self.pool.as_ref())
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(e) if unique_violation_constraint(&e).as_deref() == Some(CODE_CONSTRAINT) => {
                Err(AppError::conflict(
                    "Short code already exists",
                    json!({ "code": new_link.code }),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, user_id, code, original_url, created_at
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM links WHERE code = $1)")
            .bind(code)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(exists)
    }

    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, user_id, code, original_url, created_at
            FROM links
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn find_by_owner_and_id(
        &self,
        user_id: i64,
        link_id: i64,
    ) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, user_id, code, original_url, created_at
            FROM links
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(link_id)
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn delete_by_owner_and_id(
        &self,
        user_id: i64,
        link_id: i64,
    ) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            DELETE FROM links
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, code, original_url, created_at
            "#,
        )
        .bind(link_id)
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }
}
