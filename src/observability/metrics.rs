//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_transactions_total` (counter): transactions by kind, outcome
//! - `gateway_transaction_duration_seconds` (histogram): latency by kind
//!
//! Recording is a no-op until a recorder is installed, so library users and
//! tests pay nothing when the exporter is disabled.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed transaction.
pub fn record_transaction(kind: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!("gateway_transactions_total", "kind" => kind, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("gateway_transaction_duration_seconds", "kind" => kind)
        .record(start.elapsed().as_secs_f64());
}
