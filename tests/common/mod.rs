#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use redis_url_shortener::config::Config;
use redis_url_shortener::domain::repositories::{
    KeyTtl, KeyValueStore, StoreError, StoreResult,
};
use redis_url_shortener::infrastructure::store::MemoryStore;
use redis_url_shortener::routes::router;
use redis_url_shortener::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::Layer;

pub const TEST_DOMAIN: &str = "short.ly";
pub const TEST_PEER: &str = "127.0.0.1:12345";

pub fn test_config() -> Config {
    Config {
        domain: TEST_DOMAIN.to_string(),
        listen_addr: "127.0.0.1:0".to_string(),
        redis_url: None,
        redis_links_db: 0,
        redis_quota_db: 1,
        redis_pool_size: 4,
        redis_pool_timeout_secs: 1,
        api_quota: 10,
        quota_window_secs: 1800,
        default_expiry_hours: 24,
        request_timeout_secs: 100,
        behind_proxy: false,
        log_level: "debug".to_string(),
        log_format: "text".to_string(),
    }
}

/// State over fresh in-memory stores, returned alongside for inspection.
pub fn create_test_state(config: &Config) -> (AppState, Arc<MemoryStore>, Arc<MemoryStore>) {
    let links = Arc::new(MemoryStore::new());
    let quotas = Arc::new(MemoryStore::new());
    let state = AppState::new(config, links.clone(), quotas.clone());
    (state, links, quotas)
}

pub fn test_server(state: AppState) -> TestServer {
    test_server_from(state, TEST_PEER)
}

/// Server whose requests all appear to come from `peer`.
pub fn test_server_from(state: AppState, peer: &str) -> TestServer {
    let app = router(state).layer(MockConnectInfoLayer::new(peer));
    TestServer::new(app).unwrap()
}

#[derive(Clone)]
pub struct MockConnectInfoLayer {
    addr: SocketAddr,
}

impl MockConnectInfoLayer {
    pub fn new(addr: &str) -> Self {
        Self {
            addr: addr.parse().unwrap(),
        }
    }
}

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService {
            inner,
            addr: self.addr,
        }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
    addr: SocketAddr,
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
        req.extensions_mut().insert(ConnectInfo(self.addr));
        self.inner.call(req)
    }
}

/// Store whose every call fails, as if Redis were down.
pub struct FailingStore;

fn down() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(down())
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl: Duration) -> StoreResult<()> {
        Err(down())
    }

    async fn set_nx_ex(&self, _key: &str, _value: &str, _ttl: Duration) -> StoreResult<bool> {
        Err(down())
    }

    async fn incr(&self, _key: &str) -> StoreResult<i64> {
        Err(down())
    }

    async fn decr(&self, _key: &str) -> StoreResult<i64> {
        Err(down())
    }

    async fn ttl(&self, _key: &str) -> StoreResult<KeyTtl> {
        Err(down())
    }

    async fn expire(&self, _key: &str, _ttl: Duration) -> StoreResult<bool> {
        Err(down())
    }

    async fn delete(&self, _key: &str) -> StoreResult<bool> {
        Err(down())
    }

    async fn ping(&self) -> bool {
        false
    }
}

/// Memory store that stalls every read by `delay`.
pub struct SlowStore {
    inner: MemoryStore,
    delay: Duration,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryStore::new(),
            delay,
        }
    }
}

#[async_trait]
impl KeyValueStore for SlowStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(key).await
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        self.inner.set_ex(key, value, ttl).await
    }

    async fn set_nx_ex(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<bool> {
        self.inner.set_nx_ex(key, value, ttl).await
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        self.inner.incr(key).await
    }

    async fn decr(&self, key: &str) -> StoreResult<i64> {
        self.inner.decr(key).await
    }

    async fn ttl(&self, key: &str) -> StoreResult<KeyTtl> {
        self.inner.ttl(key).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> StoreResult<bool> {
        self.inner.expire(key, ttl).await
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        self.inner.delete(key).await
    }

    async fn ping(&self) -> bool {
        true
    }
}
