//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the rate-mood service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Exchange-rate provider settings.
    pub exchange: ExchangeConfig,

    /// GIF search and media provider settings.
    pub gifs: GifConfig,

    /// Remote cache settings.
    pub cache: CacheConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Open Exchange Rates settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// API root, must end with a slash (e.g., "https://openexchangerates.org/api/").
    pub base_url: String,

    /// `app_id` sent with every request.
    pub api_token: String,

    /// Currency every snapshot is quoted against.
    pub base_currency: String,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openexchangerates.org/api/".to_string(),
            api_token: String::new(),
            base_currency: "USD".to_string(),
        }
    }
}

/// Tenor search and media settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GifConfig {
    /// Search API root (e.g., "https://g.tenor.com/v1/").
    pub base_url: String,

    /// API key sent with every search.
    pub api_token: String,

    /// Media storage root the GIF bytes are downloaded from.
    pub media_base_url: String,

    /// Maximum number of ids requested per search.
    pub search_limit: u32,

    /// Search term used when the rate went up.
    pub risen_query: String,

    /// Search term used when the rate went down or stayed flat.
    pub fallen_query: String,
}

impl Default for GifConfig {
    fn default() -> Self {
        Self {
            base_url: "https://g.tenor.com/v1/".to_string(),
            api_token: String::new(),
            media_base_url: "https://media.tenor.com/images/".to_string(),
            search_limit: 20,
            risen_query: "rich".to_string(),
            fallen_query: "broke".to_string(),
        }
    }
}

/// Which cache backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    /// Remote Redis (or any RESP-compatible server).
    Redis,
    /// In-process store, useful for local runs without Redis.
    Memory,
}

/// Cache backend and cache-policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Backend selection.
    pub backend: CacheBackendKind,

    /// Connection URL, e.g. "redis://:password@127.0.0.1:6379/0".
    pub url: String,

    /// Deadline for every cache round trip in milliseconds.
    pub read_timeout_ms: u64,

    /// How long the cache is bypassed after a connectivity failure.
    pub unavailable_cooldown_secs: u64,

    /// Lifetime of a cached rate snapshot.
    pub rates_ttl_secs: u64,

    /// Lifetime of a cached candidate id set.
    pub candidates_ttl_secs: u64,
}

impl CacheConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn unavailable_cooldown(&self) -> Duration {
        Duration::from_secs(self.unavailable_cooldown_secs)
    }

    pub fn rates_ttl(&self) -> Duration {
        Duration::from_secs(self.rates_ttl_secs)
    }

    pub fn candidates_ttl(&self) -> Duration {
        Duration::from_secs(self.candidates_ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::Redis,
            url: "redis://127.0.0.1:6379/0".to_string(),
            read_timeout_ms: 100,
            unavailable_cooldown_secs: 60,
            rates_ttl_secs: 10 * 60,
            candidates_ttl_secs: 24 * 60 * 60,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout enforced by the HTTP layer.
    pub request_secs: u64,

    /// Per-call timeout for exchange and GIF providers.
    pub upstream_secs: u64,

    /// TCP connect timeout for providers.
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 10,
            connect_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log cache decisions and request flow at debug level.
    pub verbose: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            verbose: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
