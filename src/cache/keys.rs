//! Cache key construction.
//!
//! Keys are only built through the constructors below so each data kind
//! lives in its own namespace and equal lookups always map to equal keys.

use chrono::NaiveDate;
use std::fmt;

const RATES_NAMESPACE: &str = "openexchange_cache";
const GIF_IDS_NAMESPACE: &str = "tenor_cache:gif_ids";
const GIF_NAMESPACE: &str = "tenor_cache:gif";

/// A fully qualified cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Rate snapshot for one date quoted against `base`.
    pub fn rates(date: NaiveDate, base: &str) -> Self {
        Self(format!("{}:{}:{}", RATES_NAMESPACE, date.format("%Y-%m-%d"), base))
    }

    /// Candidate GIF ids returned for a search query.
    pub fn gif_ids(query: &str) -> Self {
        Self(format!("{}:{}", GIF_IDS_NAMESPACE, query))
    }

    /// Raw bytes of a single GIF.
    pub fn gif(id: &str) -> Self {
        Self(format!("{}:{}", GIF_NAMESPACE, id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_key_formats() {
        assert_eq!(
            CacheKey::rates(date(2024, 3, 7), "USD").as_str(),
            "openexchange_cache:2024-03-07:USD"
        );
        assert_eq!(CacheKey::gif_ids("rich").as_str(), "tenor_cache:gif_ids:rich");
        assert_eq!(CacheKey::gif("abc123").as_str(), "tenor_cache:gif:abc123");
    }

    #[test]
    fn test_equal_lookups_equal_keys() {
        assert_eq!(
            CacheKey::rates(date(2024, 3, 7), "EUR"),
            CacheKey::rates(date(2024, 3, 7), "EUR")
        );
    }

    #[test]
    fn test_distinct_lookups_distinct_keys() {
        assert_ne!(
            CacheKey::rates(date(2024, 3, 7), "USD"),
            CacheKey::rates(date(2024, 3, 6), "USD")
        );
        assert_ne!(
            CacheKey::rates(date(2024, 3, 7), "USD"),
            CacheKey::rates(date(2024, 3, 7), "EUR")
        );
        // An id and a query with the same text live in different namespaces.
        assert_ne!(CacheKey::gif_ids("x"), CacheKey::gif("x"));
        assert_ne!(CacheKey::gif_ids("ids:x").as_str(), CacheKey::gif("gif_ids:x").as_str());
    }
}
