//! Open Exchange Rates client.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;

use crate::config::ExchangeConfig;
use crate::observability::metrics;
use crate::upstream::{RateProvider, UpstreamError, UpstreamResult};

const PROVIDER: &str = "openexchange";

#[derive(Debug, Deserialize)]
struct HistoricalResponse {
    rates: HashMap<String, f64>,
}

/// Client for the `historical/{date}.json` endpoint.
#[derive(Debug, Clone)]
pub struct OpenExchangeClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl OpenExchangeClient {
    pub fn new(http: reqwest::Client, config: &ExchangeConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
        }
    }
}

#[async_trait]
impl RateProvider for OpenExchangeClient {
    async fn historical_rates(&self, date: NaiveDate, base: &str) -> UpstreamResult<HashMap<String, f64>> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let url = format!("{}historical/{}.json", self.base_url, date_str);

        tracing::debug!(date = %date_str, base = %base, "Requesting historical rates");

        let response = self
            .http
            .get(&url)
            .query(&[("app_id", self.api_token.as_str()), ("base", base)])
            .send()
            .await
            .map_err(|source| {
                metrics::record_upstream_call(PROVIDER, "transport_error");
                UpstreamError::Transport { provider: PROVIDER, source }
            })?;

        let status = response.status();
        metrics::record_upstream_call(PROVIDER, status.as_str());
        match status {
            StatusCode::UNAUTHORIZED => return Err(UpstreamError::Unauthorized { provider: PROVIDER }),
            StatusCode::FORBIDDEN => return Err(UpstreamError::ForbiddenBase(base.to_string())),
            StatusCode::BAD_REQUEST => return Err(UpstreamError::BadDate(date_str)),
            s if !s.is_success() => {
                return Err(UpstreamError::Status {
                    provider: PROVIDER,
                    status: s.as_u16(),
                })
            }
            _ => {}
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| UpstreamError::Transport { provider: PROVIDER, source })?;
        parse_rates(&body)
    }
}

/// Extract the `rates` object from a historical-rates payload.
fn parse_rates(body: &[u8]) -> UpstreamResult<HashMap<String, f64>> {
    let parsed: HistoricalResponse = serde_json::from_slice(body).map_err(|e| UpstreamError::Decode {
        provider: PROVIDER,
        message: e.to_string(),
    })?;
    Ok(parsed.rates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rates() {
        let body = br#"{
            "disclaimer": "Usage subject to terms",
            "timestamp": 1700000000,
            "base": "USD",
            "rates": { "EUR": 0.91, "JPY": 150, "USD": 1 }
        }"#;
        let rates = parse_rates(body).unwrap();
        assert_eq!(rates.len(), 3);
        assert_eq!(rates["EUR"], 0.91);
        assert_eq!(rates["JPY"], 150.0);
    }

    #[test]
    fn test_parse_rejects_non_numeric_rate() {
        let err = parse_rates(br#"{"rates": {"EUR": "lots"}}"#).unwrap_err();
        assert!(matches!(err, UpstreamError::Decode { provider: "openexchange", .. }));
    }

    #[test]
    fn test_parse_rejects_missing_rates() {
        assert!(parse_rates(br#"{"error": true}"#).is_err());
    }
}
