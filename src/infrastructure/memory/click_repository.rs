//! In-memory click repository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// Append-only click log kept in a vector.
#[derive(Default)]
pub struct InMemoryClickRepository {
    clicks: Mutex<Vec<Click>>,
}

impl InMemoryClickRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded click, oldest first.
    pub async fn all(&self) -> Vec<Click> {
        self.clicks.lock().await.clone()
    }
}

#[async_trait]
impl ClickRepository for InMemoryClickRepository {
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError> {
        let mut clicks = self.clicks.lock().await;

        let click = Click::new(
            clicks.len() as i64 + 1,
            new_click.link_id,
            Utc::now(),
            new_click.user_agent,
            new_click.ip,
        );
        clicks.push(click.clone());

        Ok(click)
    }

    async fn count_by_links(&self, link_ids: &[i64]) -> Result<HashMap<i64, i64>, AppError> {
        let clicks = self.clicks.lock().await;

        let mut counts = HashMap::new();
        for click in clicks.iter().filter(|c| link_ids.contains(&c.link_id)) {
            *counts.entry(click.link_id).or_insert(0) += 1;
        }

        Ok(counts)
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        Ok(self.clicks.lock().await.len() as i64)
    }
}
