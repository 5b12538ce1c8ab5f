//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, path, status
//! - `gateway_request_duration_seconds` (histogram): end-to-end latency
//! - `gateway_upstream_requests_total` (counter): upstream calls by resource, outcome
//! - `gateway_upstream_duration_seconds` (histogram): upstream latency by resource
//! - `gateway_rate_limited_total` (counter): 429 responses
//! - `gateway_rate_limit_windows` (gauge): live per-client windows after a sweep
//!
//! Recording is a no-op until a recorder is installed, so handlers and tests
//! can call these unconditionally.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "gateway_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream(resource: &'static str, outcome: &'static str, start: Instant) {
    counter!("gateway_upstream_requests_total", "resource" => resource, "outcome" => outcome)
        .increment(1);
    histogram!("gateway_upstream_duration_seconds", "resource" => resource)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited() {
    counter!("gateway_rate_limited_total").increment(1);
}

pub fn record_rate_limit_windows(count: usize) {
    gauge!("gateway_rate_limit_windows").set(count as f64);
}
