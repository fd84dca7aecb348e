//! HTTP routes for the geocoder quota service
//!
//! This module defines all HTTP endpoints exposed by the service.

pub mod health;
pub mod matrix;
pub mod metrics;
pub mod quota;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/v1/users/:user_id/quota", get(quota::get_quota))
        .route("/v1/users/:user_id/quota/check", post(quota::check_quota))
        .route("/v1/users/:user_id/usage", post(quota::record_usage))
        .route("/v1/matrix/one_to_many", post(matrix::one_to_many));

    // Public routes (health checks, metrics)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::prometheus_metrics));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
