mod common;

use common::MemoryCache;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_delete_wins_over_pending_cache_fill() {
    let cache = Arc::new(MemoryCache::with_fill_delay(Duration::from_millis(100)));
    let app = common::create_test_app_with_cache(cache.clone());
    let token = common::sign_up(&app.server, "alice@example.com").await;

    let link = common::create_link(&app.server, &token, "https://example.com").await;
    let code = link["code"].as_str().unwrap();
    let id = link["id"].as_i64().unwrap();

    // Store hit; the cache fill is still sleeping when the delete lands.
    let first = app.server.get(&format!("/{code}")).await;
    assert_eq!(first.status_code(), 307);

    let deleted = app
        .server
        .delete(&format!("/links/{id}"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(deleted.status_code(), 204);

    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(!cache.is_cached(code).await);
    let after = app.server.get(&format!("/{code}")).await;
    assert_eq!(after.status_code(), 404);
}

#[tokio::test]
async fn test_delete_evicts_cached_link() {
    let cache = Arc::new(MemoryCache::new());
    let app = common::create_test_app_with_cache(cache.clone());
    let token = common::sign_up(&app.server, "alice@example.com").await;

    let link = common::create_link(&app.server, &token, "https://example.com").await;
    let code = link["code"].as_str().unwrap();
    let id = link["id"].as_i64().unwrap();

    app.server.get(&format!("/{code}")).await;
    tokio::time::timeout(Duration::from_secs(2), async {
        while !cache.is_cached(code).await {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("link was not cached");

    let deleted = app
        .server
        .delete(&format!("/links/{id}"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(deleted.status_code(), 204);

    let after = app.server.get(&format!("/{code}")).await;
    assert_eq!(after.status_code(), 404);
}

#[tokio::test]
async fn test_failed_invalidation_keeps_link_and_reports_error() {
    let cache = Arc::new(MemoryCache::new());
    let app = common::create_test_app_with_cache(cache.clone());
    let token = common::sign_up(&app.server, "alice@example.com").await;

    let link = common::create_link(&app.server, &token, "https://example.com").await;
    let code = link["code"].as_str().unwrap();
    let id = link["id"].as_i64().unwrap();

    cache.set_fail_invalidate(true);

    let failed = app
        .server
        .delete(&format!("/links/{id}"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(failed.status_code(), 500);
    assert_eq!(failed.json::<Value>()["error"]["code"], "internal_error");

    let listed = app
        .server
        .get("/links")
        .authorization_bearer(&token)
        .await
        .json::<Vec<Value>>();
    assert_eq!(listed.len(), 1);

    cache.set_fail_invalidate(false);

    let retried = app
        .server
        .delete(&format!("/links/{id}"))
        .authorization_bearer(&token)
        .await;
    assert_eq!(retried.status_code(), 204);

    let after = app.server.get(&format!("/{code}")).await;
    assert_eq!(after.status_code(), 404);
}
