//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_config_builds_total` (counter): builds by outcome
//!   (`success`, `invalid`, `error`)
//! - `gateway_config_build_duration_seconds` (histogram): build latency
//! - `gateway_config_validation_errors_total` (counter): errors reported by
//!   rejected builds
//! - `gateway_config_routes` (gauge): routes in the last built snapshot
//! - `gateway_config_reloads_total` (counter): reloads by outcome
//!   (`applied`, `rejected`, `parse_error`)
//!
//! Recording is a no-op until a recorder is installed, so library users and
//! tests pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve `/metrics` on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_build(outcome: &'static str, started: Instant) {
    ::metrics::counter!("gateway_config_builds_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("gateway_config_build_duration_seconds", "outcome" => outcome)
        .record(started.elapsed().as_secs_f64());
}

pub fn record_validation_errors(count: usize) {
    ::metrics::counter!("gateway_config_validation_errors_total").increment(count as u64);
}

pub fn record_routes(count: usize) {
    ::metrics::gauge!("gateway_config_routes").set(count as f64);
}

pub fn record_reload(outcome: &'static str) {
    ::metrics::counter!("gateway_config_reloads_total", "outcome" => outcome).increment(1);
}
