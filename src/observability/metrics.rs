//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define router metrics (navigations, HTTP requests, latency)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `router_navigations_total` (counter): navigations by route, outcome
//! - `router_http_requests_total` (counter): server requests by route, status
//! - `router_http_request_duration_seconds` (histogram): server latency by route

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one router navigation.
pub fn record_navigation(route: &str, outcome: &'static str) {
    ::metrics::counter!(
        "router_navigations_total",
        "route" => route.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Count one server request and its latency.
pub fn record_request(route: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "router_http_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!(
        "router_http_request_duration_seconds",
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
