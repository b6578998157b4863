//! Today-versus-yesterday comparison and GIF resolution.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheAsideFetcher, CacheStore, FetchError};
use crate::config::{GifConfig, ServiceConfig};
use crate::diff::error::{DiffError, DiffResult};
use crate::diff::outcome::Outcome;
use crate::gifs::{CandidateIdLookup, CandidateSelector, GifAsset, GifAssetLookup};
use crate::rates::{DualFetch, RateSnapshotLookup};
use crate::resilience::AvailabilityBreaker;
use crate::upstream::{GifProvider, RateProvider};

/// Settings the service needs from the configuration.
#[derive(Debug, Clone)]
pub struct DiffSettings {
    pub base_currency: String,
    pub gifs: GifConfig,
    pub rates_ttl: Duration,
    pub candidates_ttl: Duration,
}

impl DiffSettings {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            base_currency: config.exchange.base_currency.clone(),
            gifs: config.gifs.clone(),
            rates_ttl: config.cache.rates_ttl(),
            candidates_ttl: config.cache.candidates_ttl(),
        }
    }
}

/// Result of one comparison.
#[derive(Debug, Clone)]
pub struct DiffReport {
    pub currency: String,
    pub today_rate: f64,
    pub yesterday_rate: f64,
    pub outcome: Outcome,
    pub gif: GifAsset,
}

/// Compares a currency against the base for today and yesterday and picks
/// a GIF for the direction it moved.
pub struct DiffService {
    fetcher: CacheAsideFetcher,
    dual: DualFetch,
    selector: Arc<CandidateSelector>,
    rates: Arc<dyn RateProvider>,
    gifs: Arc<dyn GifProvider>,
    settings: DiffSettings,
}

impl DiffService {
    pub fn new(
        fetcher: CacheAsideFetcher,
        rates: Arc<dyn RateProvider>,
        gifs: Arc<dyn GifProvider>,
        selector: Arc<CandidateSelector>,
        settings: DiffSettings,
    ) -> Self {
        Self {
            dual: DualFetch::new(fetcher.clone()),
            fetcher,
            selector,
            rates,
            gifs,
            settings,
        }
    }

    /// Wire a service from configuration around an existing store. The
    /// breaker and the random source are created here, once.
    pub fn from_config(
        config: &ServiceConfig,
        store: Arc<dyn CacheStore>,
        rates: Arc<dyn RateProvider>,
        gifs: Arc<dyn GifProvider>,
    ) -> Self {
        let breaker = Arc::new(AvailabilityBreaker::new(config.cache.unavailable_cooldown()));
        Self::new(
            CacheAsideFetcher::new(store, breaker),
            rates,
            gifs,
            Arc::new(CandidateSelector::new()),
            DiffSettings::from_config(config),
        )
    }

    pub fn breaker(&self) -> &Arc<AvailabilityBreaker> {
        self.fetcher.breaker()
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        self.fetcher.store()
    }

    /// Compare `currency` for the current UTC date.
    pub async fn diff(&self, currency: &str) -> DiffResult<DiffReport> {
        self.diff_on(currency, Utc::now().date_naive()).await
    }

    /// Compare `currency` for `today` against the day before.
    pub async fn diff_on(&self, currency: &str, today: NaiveDate) -> DiffResult<DiffReport> {
        // Only NaiveDate::MIN has no predecessor.
        let yesterday = today.pred_opt().unwrap_or(today);
        let base = self.settings.base_currency.as_str();

        let today_lookup = RateSnapshotLookup::new(today, base, self.rates.clone(), self.settings.rates_ttl);
        let yesterday_lookup =
            RateSnapshotLookup::new(yesterday, base, self.rates.clone(), self.settings.rates_ttl);

        let (today_snapshot, yesterday_snapshot) =
            self.dual.fetch_pair(&today_lookup, &yesterday_lookup).await?;

        let unknown = || DiffError::UnknownCurrency(currency.to_string());
        let today_rate = today_snapshot.rate(currency).ok_or_else(unknown)?;
        let yesterday_rate = yesterday_snapshot.rate(currency).ok_or_else(unknown)?;

        let outcome = Outcome::from_rates(today_rate, yesterday_rate);
        tracing::debug!(
            currency = %currency,
            base = %base,
            today_rate,
            yesterday_rate,
            outcome = %outcome,
            "Rates compared"
        );

        let gif = self.random_gif(outcome.search_term(&self.settings.gifs)).await?;

        Ok(DiffReport {
            currency: currency.to_string(),
            today_rate,
            yesterday_rate,
            outcome,
            gif,
        })
    }

    /// Resolve a search term to the bytes of one matching GIF.
    pub async fn random_gif(&self, query: &str) -> Result<GifAsset, FetchError> {
        let ids = CandidateIdLookup::new(
            query,
            self.settings.gifs.search_limit,
            self.gifs.clone(),
            self.selector.clone(),
            self.settings.candidates_ttl,
        );
        let id = self.fetcher.fetch(&ids).await?;

        let asset = GifAssetLookup::new(&id, self.gifs.clone());
        self.fetcher.fetch(&asset).await
    }
}
