//! Request handlers.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::time::Instant;

use crate::http::response::{gif_response, status_for};
use crate::http::server::AppState;
use crate::observability::metrics;

pub const DIFF_ROUTE: &str = "/api/diff/{currency_id}";
pub const HEALTH_ROUTE: &str = "/health";

/// `GET /api/diff/{currency_id}`: a GIF matching how the currency moved.
pub async fn diff_handler(
    State(state): State<AppState>,
    Path(currency_id): Path<String>,
) -> Response {
    let start = Instant::now();
    tracing::debug!(currency = %currency_id, "Incoming diff request");

    let response = match state.service.diff(&currency_id).await {
        Ok(report) => {
            tracing::info!(
                currency = %report.currency,
                outcome = %report.outcome,
                gif_id = %report.gif.id,
                "Diff served"
            );
            gif_response(report)
        }
        Err(err) => {
            let status = status_for(&err);
            if status.is_server_error() {
                tracing::error!(currency = %currency_id, error = %err, "Diff request failed");
            } else {
                tracing::warn!(currency = %currency_id, status = %status, error = %err, "Diff request rejected");
            }
            err.into_response()
        }
    };

    metrics::record_request(DIFF_ROUTE, response.status().as_u16(), start);
    response
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub cache_backend: &'static str,
    pub cache_available: bool,
}

/// `GET /health`. Reports the breaker's view of the cache without touching
/// the backend.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthReport> {
    let cache_available = state.service.breaker().is_available();
    Json(HealthReport {
        status: if cache_available { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        cache_backend: state.service.store().backend_name(),
        cache_available,
    })
}
