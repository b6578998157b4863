//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the cache store selected by configuration
//! - Build the upstream clients and the diff service
//! - Bind the listener
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The Redis connection itself is lazy; an unreachable Redis at boot only
//!   degrades the service

use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::cache::{CacheError, CacheStore, MemoryStore, RedisStore};
use crate::config::loader::ConfigError;
use crate::config::{CacheBackendKind, CacheConfig, ServiceConfig};
use crate::diff::DiffService;
use crate::upstream::{build_http_client, OpenExchangeClient, TenorClient};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("http client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("cache backend: {0}")]
    Cache(#[from] CacheError),

    #[error("bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Create the cache store named by `config.backend` and probe it once.
pub async fn build_store(config: &CacheConfig) -> Result<Arc<dyn CacheStore>, StartupError> {
    let store: Arc<dyn CacheStore> = match config.backend {
        CacheBackendKind::Redis => Arc::new(RedisStore::new(&config.url, config.read_timeout())?),
        CacheBackendKind::Memory => Arc::new(MemoryStore::new()),
    };
    probe_store(store.as_ref()).await;
    Ok(store)
}

/// Ping the store and log the result. Never fatal and never touches the
/// breaker; the first request finds out for itself.
pub async fn probe_store(store: &dyn CacheStore) -> bool {
    match store.ping().await {
        Ok(()) => {
            tracing::info!(backend = store.backend_name(), "Cache store reachable");
            true
        }
        Err(err) => {
            tracing::warn!(
                backend = store.backend_name(),
                error = %err,
                "Cache store unreachable at startup, requests will fall back to upstream"
            );
            false
        }
    }
}

/// Wire the diff service against the real upstream providers.
pub fn build_service(
    config: &ServiceConfig,
    store: Arc<dyn CacheStore>,
) -> Result<DiffService, StartupError> {
    let http = build_http_client(&config.timeouts)?;
    let rates = Arc::new(OpenExchangeClient::new(http.clone(), &config.exchange));
    let gifs = Arc::new(TenorClient::new(http, &config.gifs));
    Ok(DiffService::from_config(config, store, rates, gifs))
}

pub async fn bind(address: &str) -> Result<TcpListener, StartupError> {
    TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.to_string(),
            source,
        })
}
