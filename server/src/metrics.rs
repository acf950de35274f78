//! Business metrics for the registration service.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `registration_requests_total{outcome}` - Register calls by outcome
//!   (registered, waitlisted, rejected)
//! - `registration_unregistrations_total{status}` - Removed registrations by
//!   the status they had
//! - `registration_promotions_total` - Waitlisted users promoted to a seat
//! - `catalog_events_created_total` - Events created
//! - `catalog_users_created_total` - Users created

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Register descriptions for all business metrics.
///
/// Call once at startup, before any metric is recorded.
pub fn register_business_metrics() {
    describe_counter!(
        "registration_requests_total",
        "Register calls by outcome (registered, waitlisted, rejected)"
    );
    describe_counter!(
        "registration_unregistrations_total",
        "Removed registrations by the status they had (registered, waitlisted)"
    );
    describe_counter!(
        "registration_promotions_total",
        "Waitlisted users promoted into a freed seat"
    );
    describe_counter!("catalog_events_created_total", "Total number of events created");
    describe_counter!("catalog_users_created_total", "Total number of users created");

    tracing::info!("Business metrics registered");
}

/// Install the Prometheus recorder and serve `/metrics` on `addr`.
///
/// Must run inside a Tokio runtime.
///
/// # Errors
///
/// Returns error if a recorder is already installed or the listener cannot
/// be bound.
pub fn install_prometheus_exporter(addr: SocketAddr) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus exporter: {e}"))?;
    tracing::info!(address = %addr, "Prometheus exporter listening");
    Ok(())
}
