//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_relay_requests_total` (counter): relayed requests by method, status
//! - `gateway_relay_duration_seconds` (histogram): relay latency
//! - `gateway_relay_failures_total` (counter): relay failures by kind
//! - `gateway_session_signals_total` (counter): upstream session signals by kind
//! - `gateway_route_guard_redirects_total` (counter): guard redirects by reason
//! - `gateway_oauth_callbacks_total` (counter): OAuth completions by outcome
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Prometheus exporter only when enabled in config

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a completed relay round trip.
pub fn record_relay(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_relay_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("gateway_relay_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a relay that failed before a response was produced.
pub fn record_relay_failure(kind: &'static str) {
    metrics::counter!("gateway_relay_failures_total", "kind" => kind).increment(1);
}

pub fn record_session_signal(kind: &'static str) {
    metrics::counter!("gateway_session_signals_total", "kind" => kind).increment(1);
}

pub fn record_guard_redirect(reason: &'static str) {
    metrics::counter!("gateway_route_guard_redirects_total", "reason" => reason).increment(1);
}

pub fn record_oauth_callback(outcome: &'static str) {
    metrics::counter!("gateway_oauth_callbacks_total", "outcome" => outcome).increment(1);
}
