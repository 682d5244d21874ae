#![allow(dead_code)]

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ConnectInfo;
use shawty::application::services::{CodeGenerator, FixedWindowLimiter, ShortenService};
use shawty::infrastructure::persistence::SqliteUrlRepository;
use shawty::state::AppState;

/// Builds an `AppState` over the test pool with rate limiting disabled
/// (zero-length cooldown windows never throttle).
pub fn create_test_state(pool: SqlitePool) -> AppState {
    create_test_state_with_cooldown(pool, 0)
}

/// Builds an `AppState` with the given cooldown in seconds.
pub fn create_test_state_with_cooldown(pool: SqlitePool, cooldown_secs: i64) -> AppState {
    let repository = Arc::new(SqliteUrlRepository::new(Arc::new(pool)));

    let shorten_service = Arc::new(ShortenService::new(
        repository.clone(),
        CodeGenerator::new(None),
        FixedWindowLimiter::new(chrono::Duration::seconds(cooldown_secs), 100),
    ));

    AppState {
        shorten_service,
        repository,
        behind_proxy: false,
    }
}

pub async fn insert_record(pool: &SqlitePool, url: &str, code: &str, created_at: DateTime<Utc>) {
    sqlx::query("INSERT INTO urls (url, code, created_at) VALUES (?, ?, ?)")
        .bind(url)
        .bind(code)
        .bind(created_at)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn count_records(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Injects a fixed peer address so handlers using `ConnectInfo` work under
/// `axum_test::TestServer`.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> tower::Layer<S> for MockConnectInfoLayer {
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
