//! Shared utilities for integration testing.
//!
//! [`MockUpstream`] plays both providers on one ephemeral port:
//! `/api/historical/{date}.json`, `/v1/search` and `/images/{id}/tenor.gif`.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use rate_mood::cache::MemoryStore;
use rate_mood::config::{CacheBackendKind, ServiceConfig};
use rate_mood::diff::DiffService;
use rate_mood::http::HttpServer;
use rate_mood::lifecycle::{self, Shutdown};

/// Scriptable upstream state with call counters.
#[derive(Default)]
pub struct MockState {
    pub today_rates: Mutex<HashMap<String, f64>>,
    pub yesterday_rates: Mutex<HashMap<String, f64>>,
    /// Status returned by the rates endpoint; 0 means 200.
    pub rates_status: AtomicU16,
    pub gif_ids: Mutex<Vec<String>>,
    pub queries: Mutex<Vec<String>>,
    pub rate_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub media_calls: AtomicUsize,
}

impl MockState {
    pub fn set_rate(&self, currency: &str, today: f64, yesterday: f64) {
        self.today_rates.lock().unwrap().insert(currency.to_string(), today);
        self.yesterday_rates.lock().unwrap().insert(currency.to_string(), yesterday);
    }

    pub fn set_gif_ids(&self, ids: &[&str]) {
        *self.gif_ids.lock().unwrap() = ids.iter().map(|id| id.to_string()).collect();
    }

    pub fn fail_rates_with(&self, status: u16) {
        self.rates_status.store(status, Ordering::SeqCst);
    }

    pub fn rate_calls(&self) -> usize {
        self.rate_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn media_calls(&self) -> usize {
        self.media_calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

/// Bytes served for a GIF id.
pub fn gif_bytes(id: &str) -> Vec<u8> {
    format!("GIF89a:{id}").into_bytes()
}

pub struct MockUpstream {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

#[derive(Clone)]
struct MockContext {
    addr: SocketAddr,
    state: Arc<MockState>,
}

async fn historical(
    State(ctx): State<MockContext>,
    Path(file): Path<String>,
) -> Response {
    ctx.state.rate_calls.fetch_add(1, Ordering::SeqCst);

    let status = ctx.state.rates_status.load(Ordering::SeqCst);
    if status != 0 {
        let status = StatusCode::from_u16(status).unwrap();
        return (status, Json(json!({ "error": true, "status": status.as_u16() }))).into_response();
    }

    let date = file.trim_end_matches(".json");
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let rates = if date == today {
        ctx.state.today_rates.lock().unwrap().clone()
    } else {
        ctx.state.yesterday_rates.lock().unwrap().clone()
    };
    Json(json!({ "base": "USD", "rates": rates })).into_response()
}

async fn search(
    State(ctx): State<MockContext>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    ctx.state.search_calls.fetch_add(1, Ordering::SeqCst);
    ctx.state
        .queries
        .lock()
        .unwrap()
        .push(params.get("q").cloned().unwrap_or_default());

    let results: Vec<_> = ctx
        .state
        .gif_ids
        .lock()
        .unwrap()
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "media": [{ "gif": { "url": format!("http://{}/images/{}/tenor.gif", ctx.addr, id) } }]
            })
        })
        .collect();
    Json(json!({ "results": results })).into_response()
}

async fn media(State(ctx): State<MockContext>, Path(id): Path<String>) -> Response {
    ctx.state.media_calls.fetch_add(1, Ordering::SeqCst);
    gif_bytes(&id).into_response()
}

/// Start the mock providers on an ephemeral port.
pub async fn start_mock_upstream() -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(MockState::default());

    let app = Router::new()
        .route("/api/historical/{file}", get(historical))
        .route("/v1/search", get(search))
        .route("/images/{id}/tenor.gif", get(media))
        .with_state(MockContext {
            addr,
            state: state.clone(),
        });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, state }
}

/// Configuration pointing every provider at `upstream`, with the in-process
/// cache.
pub fn test_config(upstream: &MockUpstream) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.exchange.base_url = format!("http://{}/api/", upstream.addr);
    config.exchange.api_token = "test-token".to_string();
    config.gifs.base_url = format!("http://{}/v1/", upstream.addr);
    config.gifs.media_base_url = format!("http://{}/images/", upstream.addr);
    config.gifs.api_token = "test-key".to_string();
    config.cache.backend = CacheBackendKind::Memory;
    config
}

/// A running service with a handle on its store.
pub struct TestService {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub service: Arc<DiffService>,
    shutdown: Shutdown,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the service against `upstream` on an ephemeral port.
pub async fn start_service(upstream: &MockUpstream) -> TestService {
    let config = test_config(upstream);
    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(lifecycle::build_service(&config, store.clone()).unwrap());

    let listener = lifecycle::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(service.clone(), &config.timeouts);
    let signalled = shutdown.signalled();
    tokio::spawn(async move {
        let _ = server.run(listener, signalled).await;
    });

    TestService {
        base_url: format!("http://{}", addr),
        store,
        service,
        shutdown,
    }
}
