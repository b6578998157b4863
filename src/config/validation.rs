//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that parse but make no
//! sense (empty tokens, zero limits, unparseable URLs). All problems are
//! reported at once.

use std::fmt;
use url::Url;

use crate::config::schema::{CacheBackendKind, ServiceConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    check_base_url(&mut errors, "exchange.base_url", &config.exchange.base_url);
    check_base_url(&mut errors, "gifs.base_url", &config.gifs.base_url);
    check_base_url(&mut errors, "gifs.media_base_url", &config.gifs.media_base_url);

    let base = &config.exchange.base_currency;
    if base.len() != 3 || !base.chars().all(|c| c.is_ascii_uppercase()) {
        errors.push(ValidationError::new(
            "exchange.base_currency",
            format!("'{}' is not a three-letter uppercase currency code", base),
        ));
    }

    if config.gifs.search_limit == 0 {
        errors.push(ValidationError::new("gifs.search_limit", "must be greater than zero"));
    }
    if config.gifs.risen_query.trim().is_empty() {
        errors.push(ValidationError::new("gifs.risen_query", "must not be empty"));
    }
    if config.gifs.fallen_query.trim().is_empty() {
        errors.push(ValidationError::new("gifs.fallen_query", "must not be empty"));
    }

    if config.cache.backend == CacheBackendKind::Redis && config.cache.url.is_empty() {
        errors.push(ValidationError::new("cache.url", "required for the redis backend"));
    }
    if config.cache.read_timeout_ms == 0 {
        errors.push(ValidationError::new("cache.read_timeout_ms", "must be greater than zero"));
    }
    if config.cache.rates_ttl_secs == 0 {
        errors.push(ValidationError::new("cache.rates_ttl_secs", "must be greater than zero"));
    }
    if config.cache.candidates_ttl_secs == 0 {
        errors.push(ValidationError::new("cache.candidates_ttl_secs", "must be greater than zero"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than zero"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::new("timeouts.upstream_secs", "must be greater than zero"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// Relative joins drop the last path segment unless the base ends with '/'.
fn check_base_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match Url::parse(value) {
        Ok(url) if !url.path().ends_with('/') => {
            errors.push(ValidationError::new(field, "must end with '/'"));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new(field, format!("invalid URL: {}", e))),
    }
}
