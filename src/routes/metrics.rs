//! Prometheus metrics endpoint
//!
//! Exposes application metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

fn register_metrics() {
    metrics::describe_counter!(
        "geocoder_quota_store_operations_total",
        "Total quota store operations"
    );
    metrics::describe_counter!(
        "geocoder_quota_checks_total",
        "Total quota checks by outcome"
    );
    metrics::describe_counter!(
        "geocoder_quota_usage_increments_total",
        "Total geocoder usage recorded per bucket"
    );
}

/// Prometheus metrics endpoint handler
///
/// Returns metrics in Prometheus text format for scraping.
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a quota store operation
pub fn record_store_operation(operation: &str, result: &str) {
    metrics::counter!(
        "geocoder_quota_store_operations_total",
        "operation" => operation.to_string(),
        "result" => result.to_string()
    )
    .increment(1);
}

/// Record the outcome of a quota check
pub fn record_quota_check(result: &str) {
    metrics::counter!("geocoder_quota_checks_total", "result" => result.to_string()).increment(1);
}

/// Record usage added to a bucket
pub fn record_usage_increment(bucket: &str, amount: i64) {
    metrics::counter!(
        "geocoder_quota_usage_increments_total",
        "bucket" => bucket.to_string()
    )
    .increment(amount.max(0) as u64);
}
