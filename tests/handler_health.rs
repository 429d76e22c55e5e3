mod common;

use async_trait::async_trait;
use axum_test::TestServer;
use linkshort::domain::entities::{Link, NewLink};
use linkshort::domain::repositories::LinkRepository;
use linkshort::error::AppError;
use linkshort::infrastructure::cache::NullCache;
use linkshort::infrastructure::memory::{InMemoryClickRepository, InMemoryUserRepository};
use linkshort::routes;
use linkshort::state::AppState;
use serde_json::{Value, json};
use std::sync::Arc;

/// A link store whose backend is unreachable.
struct UnreachableLinkRepository;

fn unreachable() -> AppError {
    AppError::internal("Database error", json!({}))
}

#[async_trait]
impl LinkRepository for UnreachableLinkRepository {
    async fn create(&self, _new_link: NewLink) -> Result<Link, AppError> {
        Err(unreachable())
    }

    async fn find_by_code(&self, _code: &str) -> Result<Option<Link>, AppError> {
        Err(unreachable())
    }

    async fn code_exists(&self, _code: &str) -> Result<bool, AppError> {
        Err(unreachable())
    }

    async fn list_by_owner(&self, _user_id: i64) -> Result<Vec<Link>, AppError> {
        Err(unreachable())
    }

    async fn find_by_owner_and_id(
        &self,
        _user_id: i64,
        _link_id: i64,
    ) -> Result<Option<Link>, AppError> {
        Err(unreachable())
    }

    async fn delete_by_owner_and_id(
        &self,
        _user_id: i64,
        _link_id: i64,
    ) -> Result<Option<Link>, AppError> {
        Err(unreachable())
    }
}

#[tokio::test]
async fn test_health_check_healthy() {
    let app = common::create_test_app();

    let response = app.server.get("/health").await;

    assert_eq!(response.status_code(), 200);

    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["storage"]["status"], "ok");
    assert_eq!(body["checks"]["click_recorder"]["status"], "ok");
    assert_eq!(body["checks"]["cache"]["status"], "ok");
}

#[tokio::test]
async fn test_health_check_degraded_when_storage_down() {
    let state = AppState::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(UnreachableLinkRepository),
        Arc::new(InMemoryClickRepository::new()),
        Arc::new(NullCache::new()),
        common::test_settings(),
    );
    let server = TestServer::new(routes::router(state, None)).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);

    let body = response.json::<Value>();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["storage"]["status"], "error");
}

#[tokio::test]
async fn test_storage_failure_on_redirect_is_internal_error() {
    let state = AppState::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(UnreachableLinkRepository),
        Arc::new(InMemoryClickRepository::new()),
        Arc::new(NullCache::new()),
        common::test_settings(),
    );
    let server = TestServer::new(
        routes::router(state, None).layer(common::MockConnectInfoLayer),
    )
    .unwrap();

    let response = server.get("/aB3xY9z").await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(response.json::<Value>()["error"]["code"], "internal_error");
}
