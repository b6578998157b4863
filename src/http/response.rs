//! Response construction and error mapping.
//!
//! # Design Decisions
//! - Error bodies are a short reason; details stay in the logs
//! - Only an upstream credential rejection surfaces as 401

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::diff::{DiffError, DiffReport};

/// Header carrying the direction the rate moved.
pub const X_RATE_OUTCOME: &str = "x-rate-outcome";

/// Status code for a failed diff request.
pub fn status_for(error: &DiffError) -> StatusCode {
    match error {
        DiffError::UnknownCurrency(_) => StatusCode::NOT_FOUND,
        err if err.is_unauthorized() => StatusCode::UNAUTHORIZED,
        DiffError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for DiffError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let reason = match status {
            StatusCode::NOT_FOUND => "unknown currency code",
            StatusCode::UNAUTHORIZED => "upstream rejected credentials",
            _ => "internal error",
        };
        (status, reason).into_response()
    }
}

/// The GIF for a successful comparison.
pub fn gif_response(report: DiffReport) -> Response {
    let outcome = HeaderValue::from_static(report.outcome.as_str());
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/gif")),
            (header::HeaderName::from_static(X_RATE_OUTCOME), outcome),
        ],
        Body::from(report.gif.content),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FetchError;
    use crate::diff::Outcome;
    use crate::gifs::GifAsset;
    use crate::upstream::UpstreamError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&DiffError::UnknownCurrency("XYZ".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&DiffError::Fetch(FetchError::Upstream(UpstreamError::Unauthorized {
                provider: "tenor"
            }))),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&DiffError::Fetch(FetchError::Upstream(UpstreamError::ForbiddenBase(
                "EUR".into()
            )))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&DiffError::Fetch(FetchError::Cache("boom".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_gif_response_headers() {
        let response = gif_response(DiffReport {
            currency: "EUR".into(),
            today_rate: 1.0,
            yesterday_rate: 0.5,
            outcome: Outcome::Risen,
            gif: GifAsset {
                id: "abc".into(),
                content: b"GIF89a".to_vec(),
            },
        });
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/gif");
        assert_eq!(response.headers()[X_RATE_OUTCOME], "risen");
    }
}
