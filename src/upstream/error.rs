//! Upstream provider errors.

use thiserror::Error;

/// Errors that can occur when talking to an upstream provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The provider rejected our API token.
    #[error("{provider} rejected the API token")]
    Unauthorized { provider: &'static str },

    /// The provider refused the requested base currency.
    #[error("base currency {0} is not allowed by the rate provider")]
    ForbiddenBase(String),

    /// The provider rejected the requested date.
    #[error("rate provider rejected date {0}")]
    BadDate(String),

    /// Any other non-success HTTP status.
    #[error("{provider} answered with HTTP {status}")]
    Status { provider: &'static str, status: u16 },

    /// A successful answer that carried nothing usable.
    #[error("{provider} returned no results for {query:?}")]
    EmptyResult { provider: &'static str, query: String },

    /// Network or protocol failure.
    #[error("{provider} transport error: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The body could not be parsed.
    #[error("{provider} returned a malformed payload: {message}")]
    Decode { provider: &'static str, message: String },
}

impl UpstreamError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, UpstreamError::Unauthorized { .. })
    }
}

/// Result type for upstream calls.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UpstreamError::Unauthorized { provider: "tenor" };
        assert_eq!(err.to_string(), "tenor rejected the API token");
        assert!(err.is_unauthorized());

        let err = UpstreamError::Status {
            provider: "openexchange",
            status: 503,
        };
        assert_eq!(err.to_string(), "openexchange answered with HTTP 503");
        assert!(!err.is_unauthorized());
    }
}
