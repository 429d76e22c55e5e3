#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use linkshort::domain::repositories::ClickRepository;
use linkshort::infrastructure::cache::{
    CacheError, CacheResult, CacheService, CachedLink, NullCache,
};
use linkshort::infrastructure::memory::{
    InMemoryClickRepository, InMemoryLinkRepository, InMemoryUserRepository,
};
use linkshort::routes;
use linkshort::state::{AppState, StateSettings};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tower::Layer;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const TEST_BASE_URL: &str = "http://sho.rt";
pub const TEST_PASSWORD: &str = "correct horse battery";

/// Injects a fixed peer address, as `into_make_service_with_connect_info` would.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// A server over in-memory stores, plus a handle on the click store.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub clicks: Arc<InMemoryClickRepository>,
}

pub fn test_settings() -> StateSettings {
    StateSettings {
        base_url: TEST_BASE_URL.to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        click_max_in_flight: 64,
        behind_proxy: false,
    }
}

pub fn create_test_state() -> (AppState, Arc<InMemoryClickRepository>) {
    create_test_state_with_cache(Arc::new(NullCache::new()))
}

pub fn create_test_state_with_cache(
    cache: Arc<dyn CacheService>,
) -> (AppState, Arc<InMemoryClickRepository>) {
    let clicks = Arc::new(InMemoryClickRepository::new());

    let state = AppState::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryLinkRepository::new()),
        clicks.clone(),
        cache,
        test_settings(),
    );

    (state, clicks)
}

pub fn create_test_app() -> TestApp {
    create_test_app_with_cache(Arc::new(NullCache::new()))
}

pub fn create_test_app_with_cache(cache: Arc<dyn CacheService>) -> TestApp {
    let (state, clicks) = create_test_state_with_cache(cache);
    let app = routes::router(state.clone(), None).layer(MockConnectInfoLayer);

    TestApp {
        server: TestServer::new(app).unwrap(),
        state,
        clicks,
    }
}

pub async fn register(server: &TestServer, email: &str) -> Value {
    let response = server
        .post("/auth/register")
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .await;

    assert_eq!(response.status_code(), 201, "{}", response.text());
    response.json::<Value>()
}

pub async fn login(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/auth/login")
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .await;

    assert_eq!(response.status_code(), 200, "{}", response.text());
    response.json::<Value>()["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Registers and logs in, returning a Bearer token.
pub async fn sign_up(server: &TestServer, email: &str) -> String {
    register(server, email).await;
    login(server, email).await
}

pub async fn create_link(server: &TestServer, token: &str, url: &str) -> Value {
    let response = server
        .post("/links")
        .authorization_bearer(token)
        .json(&json!({ "url": url }))
        .await;

    assert_eq!(response.status_code(), 201, "{}", response.text());
    response.json::<Value>()
}

/// Waits for detached click writes to land.
pub async fn wait_for_clicks(clicks: &InMemoryClickRepository, expected: i64) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while clicks.count_all().await.unwrap() < expected {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("clicks were not recorded in time");
}

enum CacheEntry {
    Live(CachedLink),
    Tombstone,
}

/// Process-local cache with the same fill and tombstone rules as Redis.
///
/// Fills can be slowed down and tombstone writes made to fail.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    fill_delay: Duration,
    fail_invalidate: AtomicBool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill_delay(fill_delay: Duration) -> Self {
        Self {
            fill_delay,
            ..Self::default()
        }
    }

    pub fn set_fail_invalidate(&self, fail: bool) {
        self.fail_invalidate.store(fail, Ordering::SeqCst);
    }

    pub async fn is_cached(&self, code: &str) -> bool {
        matches!(
            self.entries.lock().await.get(code),
            Some(CacheEntry::Live(_))
        )
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_link(&self, code: &str) -> CacheResult<Option<CachedLink>> {
        Ok(match self.entries.lock().await.get(code) {
            Some(CacheEntry::Live(link)) => Some(link.clone()),
            _ => None,
        })
    }

    async fn fill_link(
        &self,
        code: &str,
        link: &CachedLink,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<bool> {
        tokio::time::sleep(self.fill_delay).await;

        let mut entries = self.entries.lock().await;
        if entries.contains_key(code) {
            return Ok(false);
        }
        entries.insert(code.to_string(), CacheEntry::Live(link.clone()));
        Ok(true)
    }

    async fn invalidate(&self, code: &str) -> CacheResult<()> {
        if self.fail_invalidate.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionError("connection refused".to_string()));
        }

        self.entries
            .lock()
            .await
            .insert(code.to_string(), CacheEntry::Tombstone);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
