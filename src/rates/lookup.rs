//! Cache-aside lookup for rate snapshots.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheAside, CacheKey, CacheResult, CacheStore, FetchError};
use crate::rates::snapshot::RateSnapshot;
use crate::upstream::RateProvider;

/// Snapshot for one `(date, base)` pair, cached as a hash.
pub struct RateSnapshotLookup {
    key: CacheKey,
    date: NaiveDate,
    base: String,
    provider: Arc<dyn RateProvider>,
    ttl: Duration,
}

impl RateSnapshotLookup {
    pub fn new(date: NaiveDate, base: &str, provider: Arc<dyn RateProvider>, ttl: Duration) -> Self {
        Self {
            key: CacheKey::rates(date, base),
            date,
            base: base.to_string(),
            provider,
            ttl,
        }
    }
}

#[async_trait]
impl CacheAside for RateSnapshotLookup {
    type Fetched = RateSnapshot;
    type Output = RateSnapshot;
    const KIND: &'static str = "rates";

    fn key(&self) -> &CacheKey {
        &self.key
    }

    async fn read(&self, store: &dyn CacheStore) -> CacheResult<Option<RateSnapshot>> {
        match store.hash_get_all(&self.key).await? {
            Some(fields) => RateSnapshot::from_cache_fields(fields).map(Some),
            None => Ok(None),
        }
    }

    async fn fetch(&self) -> Result<RateSnapshot, FetchError> {
        let rates = self.provider.historical_rates(self.date, &self.base).await?;
        Ok(RateSnapshot::new(rates))
    }

    async fn write(&self, store: &dyn CacheStore, fetched: &RateSnapshot) -> CacheResult<()> {
        store.hash_set_all(&self.key, &fetched.to_cache_fields(), self.ttl).await
    }

    fn resolve(&self, fetched: RateSnapshot) -> Result<RateSnapshot, FetchError> {
        Ok(fetched)
    }
}
