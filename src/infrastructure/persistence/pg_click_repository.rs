//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct ClickRow {
    id: i64,
    link_id: i64,
    clicked_at: DateTime<Utc>,
    user_agent: Option<String>,
    ip: Option<String>,
}

/// PostgreSQL repository for the click log.
///
/// `link_clicks.link_id` carries no foreign key, so clicks survive the
/// deletion of their link.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError> {
        let row = sqlx::query_as::<_, ClickRow>(
            r#"
            INSERT INTO link_clicks (link_id, user_agent, ip)
            VALUES ($1, $2, $3)
            RETURNING id, link_id, clicked_at, user_agent, ip
            "#,
        )
        .bind(new_click.link_id)
        .bind(&new_click.user_agent)
        .bind(&new_click.ip)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Click::new(
            row.id,
            row.link_id,
            row.clicked_at,
            row.user_agent,
            row.ip,
        ))
    }

    async fn count_by_links(&self, link_ids: &[i64]) -> Result<HashMap<i64, i64>, AppError> {
        if link_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT link_id, COUNT(*)
            FROM link_clicks
            WHERE link_id = ANY($1)
            GROUP BY link_id
            "#,
        )
        .bind(link_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().collect())
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_clicks")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
