//! In-memory link repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Default)]
struct LinkTable {
    next_id: i64,
    rows: BTreeMap<i64, Link>,
    by_code: HashMap<String, i64>,
}

/// Link store backed by a mutex-guarded map with a code index.
///
/// The code check and the insert happen under one lock, which makes the
/// uniqueness guarantee atomic.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    table: Mutex<LinkTable>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut table = self.table.lock().await;

        if table.by_code.contains_key(&new_link.code) {
            return Err(AppError::conflict(
                "Short code already exists",
                json!({ "code": new_link.code }),
            ));
        }

        table.next_id += 1;
        let link = Link::new(
            table.next_id,
            new_link.user_id,
            new_link.code,
            new_link.original_url,
            Utc::now(),
        );
        table.by_code.insert(link.code.clone(), link.id);
        table.rows.insert(link.id, link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let table = self.table.lock().await;
        Ok(table
            .by_code
            .get(code)
            .and_then(|id| table.rows.get(id))
            .cloned())
    }

    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        let table = self.table.lock().await;
        Ok(table.by_code.contains_key(code))
    }

    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Link>, AppError> {
        let table = self.table.lock().await;

        let mut links: Vec<Link> = table
            .rows
            .values()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(links)
    }

    async fn find_by_owner_and_id(
        &self,
        user_id: i64,
        link_id: i64,
    ) -> Result<Option<Link>, AppError> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .get(&link_id)
            .filter(|l| l.user_id == user_id)
            .cloned())
    }

    async fn delete_by_owner_and_id(
        &self,
        user_id: i64,
        link_id: i64,
    ) -> Result<Option<Link>, AppError> {
        let mut table = self.table.lock().await;

        match table.rows.get(&link_id) {
            Some(link) if link.user_id == user_id => {}
            _ => return Ok(None),
        }

        let removed = table.rows.remove(&link_id);
        if let Some(link) = &removed {
            table.by_code.remove(&link.code);
        }

        Ok(removed)
    }
}
