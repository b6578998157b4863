//! Rate snapshot type.

use std::collections::HashMap;

use crate::cache::CacheError;

/// Exchange rates for one date, quoted against one base currency. The date
/// and base live in the cache key of the lookup that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    rates: HashMap<String, f64>,
}

impl RateSnapshot {
    pub fn new(rates: HashMap<String, f64>) -> Self {
        Self { rates }
    }

    /// Rebuild a snapshot from cached hash fields.
    pub fn from_cache_fields(fields: HashMap<String, String>) -> Result<Self, CacheError> {
        let rates = fields
            .into_iter()
            .map(|(currency, raw)| {
                raw.parse::<f64>()
                    .map(|rate| (currency.clone(), rate))
                    .map_err(|e| CacheError::Decode(format!("rate for {} is '{}': {}", currency, raw, e)))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(Self::new(rates))
    }

    /// Hash fields to cache this snapshot under.
    pub fn to_cache_fields(&self) -> Vec<(String, String)> {
        self.rates
            .iter()
            .map(|(currency, rate)| (currency.clone(), rate.to_string()))
            .collect()
    }

    /// Rate for a currency code. Codes are case-sensitive.
    pub fn rate(&self, currency: &str) -> Option<f64> {
        self.rates.get(currency).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_fields_round_trip_keeps_precision() {
        let rates = HashMap::from([("EUR".to_string(), 0.912345678901), ("JPY".to_string(), 148.25)]);
        let snapshot = RateSnapshot::new(rates);

        let fields: HashMap<_, _> = snapshot.to_cache_fields().into_iter().collect();
        let decoded = RateSnapshot::from_cache_fields(fields).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_rate_lookup_is_case_sensitive() {
        let snapshot = RateSnapshot::new(HashMap::from([("EUR".to_string(), 0.9)]));
        assert_eq!(snapshot.rate("EUR"), Some(0.9));
        assert_eq!(snapshot.rate("eur"), None);
    }

    #[test]
    fn test_bad_cached_field_is_decode_error() {
        let fields = HashMap::from([("EUR".to_string(), "abc".to_string())]);
        let err = RateSnapshot::from_cache_fields(fields).unwrap_err();
        assert!(matches!(err, CacheError::Decode(msg) if msg.contains("EUR")));
    }
}
