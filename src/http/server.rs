//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener and serve until shutdown

use axum::{
    body::Body,
    http::{HeaderName, Request, StatusCode},
    routing::get,
    Router,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::TimeoutConfig;
use crate::diff::DiffService;
use crate::http::handlers::{diff_handler, health_handler, DIFF_ROUTE, HEALTH_ROUTE};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DiffService>,
}

/// HTTP server for the diff endpoint.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(service: Arc<DiffService>, timeouts: &TimeoutConfig) -> Self {
        let state = AppState { service };
        let router = Self::build_router(timeouts, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers. A request that
    /// outlives `request_secs` answers 500 like any other internal failure.
    fn build_router(timeouts: &TimeoutConfig, state: AppState) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route(DIFF_ROUTE, get(diff_handler))
            .route(HEALTH_ROUTE, get(health_handler))
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::INTERNAL_SERVER_ERROR,
                Duration::from_secs(timeouts.request_secs),
            ))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id,
                )
            }))
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
    }

    /// The configured router, for serving on a custom listener or in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` resolves, then drain in-flight
    /// requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::config::ServiceConfig;
    use crate::upstream::{GifProvider, RateProvider, UpstreamError, UpstreamResult};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use tower::ServiceExt;

    struct Offline;

    #[async_trait]
    impl RateProvider for Offline {
        async fn historical_rates(&self, _date: NaiveDate, _base: &str) -> UpstreamResult<HashMap<String, f64>> {
            Err(UpstreamError::Unauthorized { provider: "offline" })
        }
    }

    #[async_trait]
    impl GifProvider for Offline {
        async fn search_ids(&self, _query: &str, _limit: u32) -> UpstreamResult<Vec<String>> {
            Err(UpstreamError::Unauthorized { provider: "offline" })
        }

        async fn fetch_gif(&self, _id: &str) -> UpstreamResult<Vec<u8>> {
            Err(UpstreamError::Unauthorized { provider: "offline" })
        }
    }

    /// Answers only after the request budget is spent.
    struct Stalled;

    #[async_trait]
    impl RateProvider for Stalled {
        async fn historical_rates(&self, _date: NaiveDate, _base: &str) -> UpstreamResult<HashMap<String, f64>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(HashMap::new())
        }
    }

    fn server() -> HttpServer {
        let service = DiffService::from_config(
            &ServiceConfig::default(),
            Arc::new(MemoryStore::new()),
            Arc::new(Offline),
            Arc::new(Offline),
        );
        HttpServer::new(Arc::new(service), &TimeoutConfig::default())
    }

    #[tokio::test]
    async fn test_health_sets_request_id() {
        let response = server()
            .router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(X_REQUEST_ID));
    }

    #[tokio::test]
    async fn test_incoming_request_id_is_kept() {
        let response = server()
            .router()
            .oneshot(
                Request::get("/health")
                    .header(X_REQUEST_ID, "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[X_REQUEST_ID], "req-42");
    }

    #[tokio::test]
    async fn test_rejected_token_maps_to_401() {
        let response = server()
            .router()
            .oneshot(Request::get("/api/diff/EUR").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_request_timeout_maps_to_500() {
        let service = DiffService::from_config(
            &ServiceConfig::default(),
            Arc::new(MemoryStore::new()),
            Arc::new(Stalled),
            Arc::new(Offline),
        );
        let timeouts = TimeoutConfig {
            request_secs: 1,
            ..TimeoutConfig::default()
        };

        let response = HttpServer::new(Arc::new(service), &timeouts)
            .router()
            .oneshot(Request::get("/api/diff/EUR").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
