//! Upstream providers.
//!
//! # Data Flow
//! ```text
//! rates lookup  → RateProvider  → exchange.rs (Open Exchange Rates)
//! gifs lookups  → GifProvider   → tenor.rs (search API + media storage)
//! ```
//!
//! # Design Decisions
//! - Providers are traits so tests can swap in fakes
//! - Every call carries the configured upstream timeout
//! - HTTP statuses are mapped to typed errors before any body is read

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::TimeoutConfig;

pub mod error;
pub mod exchange;
pub mod tenor;

pub use error::{UpstreamError, UpstreamResult};
pub use exchange::OpenExchangeClient;
pub use tenor::TenorClient;

/// Source of historical exchange rates.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Rates for `date`, quoted against `base`, keyed by currency code.
    async fn historical_rates(&self, date: NaiveDate, base: &str) -> UpstreamResult<HashMap<String, f64>>;
}

/// Source of GIF ids and GIF bytes.
#[async_trait]
pub trait GifProvider: Send + Sync {
    /// Ids of at most `limit` GIFs matching `query`, in provider order.
    async fn search_ids(&self, query: &str, limit: u32) -> UpstreamResult<Vec<String>>;

    /// Raw bytes of the GIF with the given id.
    async fn fetch_gif(&self, id: &str) -> UpstreamResult<Vec<u8>>;
}

/// Build the shared HTTP client used by both providers.
pub fn build_http_client(timeouts: &TimeoutConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeouts.upstream_secs))
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .user_agent(concat!("rate-mood/", env!("CARGO_PKG_VERSION")))
        .build()
}
