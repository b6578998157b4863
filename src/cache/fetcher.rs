//! Read-through cache in front of an upstream provider.
//!
//! A [`CacheAside`] lookup describes one data kind: where it lives in the
//! cache, how to read it back, how to fetch it from upstream and how to
//! write the fetched value. [`CacheAsideFetcher`] runs the shared algorithm:
//!
//! ```text
//! breaker open ──────────────────────────────────────┐
//! read cache ── hit ──────────────────────▶ value     │
//!      │ miss                                         ▼
//!      ├─────────▶ fetch upstream ─▶ write back ─▶ resolve ─▶ value
//!      │ connectivity error ─▶ open breaker ─▶ fetch upstream ─▶ resolve
//!      └ other error ─▶ FetchError
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::cache::error::{CacheResult, FetchError};
use crate::cache::keys::CacheKey;
use crate::cache::store::CacheStore;
use crate::observability::metrics;
use crate::resilience::{is_backend_connectivity_error, AvailabilityBreaker};

/// One cache-aside call site.
#[async_trait]
pub trait CacheAside: Send + Sync {
    /// What the upstream provider returns and what gets written back.
    type Fetched: Send + Sync;

    /// What callers receive, from either the cache or upstream.
    type Output: Send;

    /// Label for logs and metrics.
    const KIND: &'static str;

    fn key(&self) -> &CacheKey;

    /// Read the cached value. `Ok(None)` is a miss.
    async fn read(&self, store: &dyn CacheStore) -> CacheResult<Option<Self::Output>>;

    /// Fetch the authoritative value from upstream.
    async fn fetch(&self) -> Result<Self::Fetched, FetchError>;

    /// Populate the cache with a freshly fetched value.
    async fn write(&self, store: &dyn CacheStore, fetched: &Self::Fetched) -> CacheResult<()>;

    /// Turn a fetched value into what callers receive.
    fn resolve(&self, fetched: Self::Fetched) -> Result<Self::Output, FetchError>;
}

/// Runs [`CacheAside`] lookups against a shared store and breaker.
#[derive(Clone)]
pub struct CacheAsideFetcher {
    store: Arc<dyn CacheStore>,
    breaker: Arc<AvailabilityBreaker>,
}

impl CacheAsideFetcher {
    pub fn new(store: Arc<dyn CacheStore>, breaker: Arc<AvailabilityBreaker>) -> Self {
        Self { store, breaker }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub fn breaker(&self) -> &Arc<AvailabilityBreaker> {
        &self.breaker
    }

    /// Resolve `lookup` through the cache, calling upstream at most once.
    pub async fn fetch<L: CacheAside>(&self, lookup: &L) -> Result<L::Output, FetchError> {
        let key = lookup.key();

        if !self.breaker.is_available() {
            tracing::debug!(kind = L::KIND, key = %key, "Cache unavailable, going to upstream");
            metrics::record_cache_event(L::KIND, "bypass");
            return self.load(lookup, false).await;
        }

        match lookup.read(self.store.as_ref()).await {
            Ok(Some(value)) => {
                tracing::debug!(kind = L::KIND, key = %key, "Cache hit");
                metrics::record_cache_event(L::KIND, "hit");
                Ok(value)
            }
            Ok(None) => {
                tracing::debug!(kind = L::KIND, key = %key, "Cache miss, fetching from upstream");
                metrics::record_cache_event(L::KIND, "miss");
                self.load(lookup, true).await
            }
            Err(err) if is_backend_connectivity_error(&err) => {
                tracing::warn!(kind = L::KIND, key = %key, error = %err, "Cache unreachable, falling back to upstream");
                metrics::record_cache_event(L::KIND, "unreachable");
                metrics::record_breaker_trip(self.store.backend_name());
                self.breaker.mark_unavailable();
                self.load(lookup, false).await
            }
            Err(err) => {
                tracing::error!(kind = L::KIND, key = %key, error = %err, "Cache read failed");
                metrics::record_cache_event(L::KIND, "error");
                Err(err.into())
            }
        }
    }

    async fn load<L: CacheAside>(&self, lookup: &L, populate: bool) -> Result<L::Output, FetchError> {
        let fetched = lookup.fetch().await?;

        if populate {
            // Best effort: a failed write only costs latency on the next request.
            if let Err(err) = lookup.write(self.store.as_ref(), &fetched).await {
                tracing::warn!(kind = L::KIND, key = %lookup.key(), error = %err, "Cache write-back failed");
                metrics::record_cache_event(L::KIND, "write_failed");
            }
        }

        lookup.resolve(fetched)
    }
}
