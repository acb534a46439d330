//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, route
//! - `proxy_request_duration_seconds` (histogram): latency by route
//! - `proxy_upstream_errors_total` (counter): failed upstream calls by kind
//!
//! Recording is a no-op until a recorder is installed, so handlers call these
//! functions unconditionally.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "proxy_requests_total";
pub const REQUEST_DURATION: &str = "proxy_request_duration_seconds";
pub const UPSTREAM_ERRORS_TOTAL: &str = "proxy_upstream_errors_total";

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!(REQUESTS_TOTAL, "Total number of HTTP requests handled");
    describe_histogram!(REQUEST_DURATION, "HTTP request duration in seconds");
    describe_counter!(
        UPSTREAM_ERRORS_TOTAL,
        "Total number of failed calls to the API upstream"
    );

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, route: &'static str, start: Instant) {
    counter!(
        REQUESTS_TOTAL,
        "method" => method.to_string(),
        "status" => status.to_string(),
        "route" => route
    )
    .increment(1);

    histogram!(REQUEST_DURATION, "route" => route).record(start.elapsed().as_secs_f64());
}

/// Record a failed upstream call.
pub fn record_upstream_error(kind: &'static str) {
    counter!(UPSTREAM_ERRORS_TOTAL, "kind" => kind).increment(1);
}
