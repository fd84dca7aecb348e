//! Geocoder Quota - per-user geocoding quota tracking
//!
//! This library tracks each user's geocoding allowance, soft-limit flag and
//! monthly usage counters in Redis, and exposes them over a small HTTP API.
//! It also ships a pass-through client for the time/distance matrix service.

pub mod config;
pub mod error;
pub mod matrix;
pub mod quota;
pub mod routes;
pub mod store;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::config::{Config, ConnectionConfig, ConnectionParams};
pub use crate::error::{AppError, AppResult};
pub use crate::matrix::MatrixClient;
pub use crate::quota::{Period, QuotaService, QuotaStatus, QuotaTracker, StoreConnection};
pub use crate::store::{QuotaStore, RedisStore, SharedStore};

/// Application state shared across all request handlers
pub struct AppState {
    /// Quota store handle; request-scoped trackers borrow it
    pub store: SharedStore,
    pub start_time: Instant,
    /// Present only when a matrix API key is configured
    pub matrix_client: Option<Arc<MatrixClient>>,
}

impl AppState {
    /// Create a new application state
    pub async fn new(config: Config) -> Result<Self> {
        // Initialize the quota store connection
        let connection = config.redis.resolve()?;
        let store: SharedStore = Arc::new(RedisStore::connect(&connection).await?);

        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(16)
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        let matrix_client = MatrixClient::from_config(http_client, &config).map(Arc::new);

        Ok(Self {
            store,
            start_time: Instant::now(),
            matrix_client,
        })
    }

    /// Create application state over an arbitrary store, without network setup
    #[cfg(any(test, feature = "test-utils"))]
    pub fn new_for_testing(config: Config, store: SharedStore) -> Self {
        let http_client = reqwest::Client::new();
        let matrix_client = MatrixClient::from_config(http_client, &config).map(Arc::new);

        Self {
            store,
            start_time: Instant::now(),
            matrix_client,
        }
    }
}
