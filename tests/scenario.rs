mod common;

use linkshort::application::services::LinkService;
use linkshort::domain::entities::NewLink;
use linkshort::domain::repositories::LinkRepository;
use linkshort::error::AppError;
use linkshort::infrastructure::cache::NullCache;
use linkshort::infrastructure::memory::{InMemoryClickRepository, InMemoryLinkRepository};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::Arc;

#[tokio::test]
async fn test_full_link_lifecycle() {
    let app = common::create_test_app();

    common::register(&app.server, "alice@example.com").await;
    let token = common::login(&app.server, "alice@example.com").await;

    let created = app
        .server
        .post("/links")
        .authorization_bearer(&token)
        .json(&json!({ "url": "https://www.rust-lang.org/learn" }))
        .await;
    assert_eq!(created.status_code(), 201);

    let link = created.json::<Value>();
    let code = link["code"].as_str().unwrap();
    let id = link["id"].as_i64().unwrap();

    let redirect = app.server.get(&format!("/{code}")).await;
    assert_eq!(redirect.status_code(), 307);
    assert_eq!(redirect.header("location"), "https://www.rust-lang.org/learn");

    common::wait_for_clicks(&app.clicks, 1).await;

    let listed = app
        .server
        .get("/links")
        .authorization_bearer(&token)
        .await
        .json::<Vec<Value>>();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["click_count"], 1);

    let deleted = app
        .server
        .delete(&format!("/links/{id}"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(deleted.status_code(), 204);

    let gone = app.server.get(&format!("/{code}")).await;
    assert_eq!(gone.status_code(), 404);
}

#[tokio::test]
async fn test_concurrent_creation_yields_distinct_codes() {
    let links = Arc::new(InMemoryLinkRepository::new());
    let service = Arc::new(LinkService::new(
        links.clone(),
        Arc::new(InMemoryClickRepository::new()),
        Arc::new(NullCache::new()),
        common::TEST_BASE_URL.to_string(),
    ));

    let handles: Vec<_> = (0..64)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create_link(i % 4, &format!("https://example.com/{i}"))
                    .await
            })
        })
        .collect();

    let mut codes = HashSet::new();
    for handle in handles {
        let link = handle.await.unwrap().unwrap();
        assert!(codes.insert(link.code));
    }

    assert_eq!(codes.len(), 64);
}

#[tokio::test]
async fn test_store_rejects_duplicate_code() {
    let links = InMemoryLinkRepository::new();

    links
        .create(NewLink {
            user_id: 1,
            code: "aB3xY9z".to_string(),
            original_url: "https://example.com/a".to_string(),
        })
        .await
        .unwrap();

    let result = links
        .create(NewLink {
            user_id: 2,
            code: "aB3xY9z".to_string(),
            original_url: "https://example.com/b".to_string(),
        })
        .await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}
