#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use tableprof_api::config::ServerConfig;
use tableprof_api::fetch::{FetchOrchestrator, RetryPolicy};
use tableprof_api::router::build_app_router;
use tableprof_api::state::AppState;
use tableprof_core::error::CoreError;
use tableprof_core::profiling::ProfileRequest;
use tableprof_core::types::RawProfilePayload;
use tableprof_upstream::{ProfilingSource, UpstreamConfig};

/// A scripted profiling source.
///
/// Replies are consumed in order; once one reply is left it is repeated for
/// every further call. Every call is counted and its request recorded.
pub struct StubSource {
    replies: Mutex<VecDeque<Result<RawProfilePayload, CoreError>>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ProfileRequest>>,
}

impl StubSource {
    pub fn new(replies: Vec<Result<RawProfilePayload, CoreError>>) -> Arc<Self> {
        assert!(!replies.is_empty(), "StubSource needs at least one reply");
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn ok(payload: Value) -> Arc<Self> {
        Self::new(vec![Ok(payload)])
    }

    pub fn failing(err: CoreError) -> Arc<Self> {
        Self::new(vec![Err(err)])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ProfileRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfilingSource for StubSource {
    async fn fetch(&self, request: &ProfileRequest) -> Result<RawProfilePayload, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().cloned().unwrap()
        }
    }
}

pub fn billing() -> ProfileRequest {
    ProfileRequest::new(
        "nemo_telecom_data",
        "billing_finance_space",
        "billing_transactions",
    )
}

/// Retry policy for tests: three attempts, no waiting.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, std::time::Duration::ZERO)
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: "sqlite::memory:".to_string(),
        upstream: UpstreamConfig {
            base_url: "http://profiler.test/api/profiling".to_string(),
            timeout: std::time::Duration::from_secs(1),
        },
        retry: RetryPolicy::NONE,
    }
}

pub fn orchestrator(
    pool: SqlitePool,
    source: Arc<StubSource>,
    retry: RetryPolicy,
) -> FetchOrchestrator {
    FetchOrchestrator::new(pool, source, retry)
}

/// Build the full application router with all middleware layers, backed by
/// `pool` and the given stub source.
pub fn build_test_app(pool: SqlitePool, source: Arc<StubSource>) -> Router {
    let config = test_config();
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        orchestrator: Arc::new(FetchOrchestrator::new(pool, source, config.retry)),
    };
    build_app_router(state, &config)
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Send a POST request with a JSON body through the router.
pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}
