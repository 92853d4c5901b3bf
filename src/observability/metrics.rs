//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gate metrics (admissions, rejections, HTTP latency)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `gate_requests_total` (counter): admission decisions by outcome
//! - `gate_rejections_total` (counter): rejections by route
//! - `gate_tracked_routes` (gauge): distinct counter keys
//! - `gate_http_requests_total` (counter): HTTP requests by method, status
//! - `gate_http_request_duration_seconds` (histogram): latency distribution

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// An admitted request; `tracked_routes` is the key count after admission.
pub fn record_admitted(tracked_routes: usize) {
    counter!("gate_requests_total", "outcome" => "admitted").increment(1);
    gauge!("gate_tracked_routes").set(tracked_routes as f64);
}

/// A request rejected because its route hit the ceiling.
pub fn record_rejected(route: &str) {
    counter!("gate_requests_total", "outcome" => "rejected").increment(1);
    counter!("gate_rejections_total", "route" => route.to_string()).increment(1);
}

/// A finished HTTP exchange.
pub fn record_request(method: &str, status: u16, start_time: Instant) {
    counter!(
        "gate_http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gate_http_request_duration_seconds", "method" => method.to_string())
        .record(start_time.elapsed().as_secs_f64());
}
