//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rate_mood_requests_total` (counter): requests by route, status
//! - `rate_mood_request_duration_seconds` (histogram): handler latency by route
//! - `rate_mood_cache_events_total` (counter): cache outcomes by kind, event
//! - `rate_mood_cache_breaker_trips_total` (counter): breaker trips by backend
//! - `rate_mood_upstream_calls_total` (counter): upstream calls by provider, outcome
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so library code and
//!   tests call these helpers unconditionally
//! - Labels carry static names where possible

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one finished HTTP request.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    ::metrics::counter!(
        "rate_mood_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("rate_mood_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record a cache-aside outcome: `hit`, `miss`, `bypass`, `unreachable`,
/// `error` or `write_failed`.
pub fn record_cache_event(kind: &'static str, event: &'static str) {
    ::metrics::counter!(
        "rate_mood_cache_events_total",
        "kind" => kind,
        "event" => event
    )
    .increment(1);
}

pub fn record_breaker_trip(backend: &'static str) {
    ::metrics::counter!("rate_mood_cache_breaker_trips_total", "backend" => backend).increment(1);
}

/// Record an upstream call. `outcome` is the HTTP status or `transport_error`.
pub fn record_upstream_call(provider: &'static str, outcome: &str) {
    ::metrics::counter!(
        "rate_mood_upstream_calls_total",
        "provider" => provider,
        "outcome" => outcome.to_string()
    )
    .increment(1);
}
