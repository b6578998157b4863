//! Cache and fetch error types.

use thiserror::Error;

use crate::gifs::selector::EmptyCandidateSet;
use crate::upstream::UpstreamError;

/// Errors reported by a cache backend.
///
/// A missing key is not an error: stores report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backend could not be reached (refused, dropped, timed out).
    #[error("Cache connectivity error: {0}")]
    Connectivity(String),

    /// The backend answered with an error (wrong type, auth, script).
    #[error("Cache backend error: {0}")]
    Backend(String),

    /// A cached entry could not be decoded.
    #[error("Cache decode error: {0}")]
    Decode(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that escape a cache-aside fetch.
///
/// Cache misses and connectivity failures are recovered inside the fetcher,
/// so they never appear here.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The cache answered but with an error.
    #[error("cache failure: {0}")]
    Cache(String),

    /// Malformed cached or upstream payload.
    #[error("decode failure: {0}")]
    Decode(String),

    #[error(transparent)]
    EmptyCandidates(#[from] EmptyCandidateSet),
}

impl From<CacheError> for FetchError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Decode(msg) => FetchError::Decode(msg),
            other => FetchError::Cache(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_maps_to_decode() {
        let err: FetchError = CacheError::Decode("bad float".into()).into();
        assert!(matches!(err, FetchError::Decode(msg) if msg == "bad float"));
    }

    #[test]
    fn test_backend_maps_to_cache() {
        let err: FetchError = CacheError::Backend("WRONGTYPE".into()).into();
        assert_eq!(err.to_string(), "cache failure: Cache backend error: WRONGTYPE");
    }
}
