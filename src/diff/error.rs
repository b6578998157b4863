//! Diff request errors.

use thiserror::Error;

use crate::cache::FetchError;
use crate::upstream::UpstreamError;

/// Errors that can end a diff request.
#[derive(Debug, Error)]
pub enum DiffError {
    /// The requested currency is missing from a snapshot.
    #[error("unknown currency code {0:?}")]
    UnknownCurrency(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl DiffError {
    /// An upstream provider refused our credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, DiffError::Fetch(FetchError::Upstream(UpstreamError::Unauthorized { .. })))
    }
}

/// Result type for diff operations.
pub type DiffResult<T> = Result<T, DiffError>;
