//! Common test utilities for the geocoder quota service
//!
//! Shared fixtures for building the application over the in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use geocoder_quota::{routes::create_router, store::InMemoryStore, AppState, Config};

/// Test configuration constants
pub mod constants {
    /// Test user id
    pub const TEST_USER_ID: &str = "1234";
    /// Test period
    pub const TEST_PERIOD: &str = "202403";
    /// Profile key of the test user
    pub const TEST_PROFILE_KEY: &str = "geocoder:1234";
    /// Usage key of the test user for the test period
    pub const TEST_USAGE_KEY: &str = "geocoder:1234:202403";
}

/// Test application backed by an in-memory store
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    /// Build the app with default configuration
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Build the app with a custom configuration
    pub fn with_config(config: Config) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = Arc::new(AppState::new_for_testing(config, store.clone()));
        let server = TestServer::new(create_router(state)).expect("Failed to create test server");

        Self { server, store }
    }

    /// Seed the test user's profile
    pub fn with_profile(self, quota: &str, soft_limit: Option<&str>) -> Self {
        self.store
            .set_field(constants::TEST_PROFILE_KEY, "geocoding_quota", quota);
        if let Some(soft_limit) = soft_limit {
            self.store
                .set_field(constants::TEST_PROFILE_KEY, "soft_geocoder_limit", soft_limit);
        }
        self
    }

    /// Seed one usage bucket for the test period
    pub fn with_usage(self, bucket: &str, amount: i64) -> Self {
        self.store
            .set_field(constants::TEST_USAGE_KEY, bucket, &amount.to_string());
        self
    }
}
