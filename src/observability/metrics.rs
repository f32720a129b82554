//! Metrics collection and exposition.
//!
//! # Metrics
//! - `service_health_state` (gauge): last observed state ordinal, by service
//! - `service_health_queries_total` (counter): queries by service and state
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; a no-op without a recorder
//! - Prometheus exporter is opt-in from configuration

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::health::HealthState;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of one health query.
pub fn record_service_state(service: &str, state: HealthState) {
    metrics::gauge!("service_health_state", "service" => service.to_string())
        .set(f64::from(state.value()));
    metrics::counter!(
        "service_health_queries_total",
        "service" => service.to_string(),
        "state" => state.name()
    )
    .increment(1);
}
