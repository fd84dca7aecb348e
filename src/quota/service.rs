//! Quota decisions for geocoder requests
//!
//! Combines the profile and the monthly usage of a user into a single status
//! and answers whether another geocoding request may be served.

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    error::AppResult,
    quota::{keys::Period, tracker::QuotaTracker},
    routes::metrics::{record_quota_check, record_usage_increment},
    store::QuotaStore,
};

/// Usage bucket names written by the geocoder
pub mod buckets {
    /// Requests that returned a geocoded result
    pub const SUCCESS_RESPONSES: &str = "success_responses";
    /// Requests that were served but matched nothing
    pub const EMPTY_RESPONSES: &str = "empty_responses";
    /// Requests that failed at the provider
    pub const FAILED_RESPONSES: &str = "failed_responses";
}

/// Snapshot of a user's quota for one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotaStatus {
    pub user_id: String,
    pub period: Period,
    pub quota: i64,
    pub used: i64,
    pub remaining: i64,
    pub soft_limit: bool,
}

impl QuotaStatus {
    /// Whether another request may be served
    ///
    /// Soft limits never block; hard limits block once usage reaches the quota.
    pub fn allows_request(&self) -> bool {
        self.soft_limit || self.used < self.quota
    }
}

/// Outcome of a quota check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotaCheck {
    pub allowed: bool,
    pub status: QuotaStatus,
}

/// Quota service for one user
pub struct QuotaService<S> {
    tracker: QuotaTracker<S>,
}

impl<S: QuotaStore> QuotaService<S> {
    pub fn new(tracker: QuotaTracker<S>) -> Self {
        Self { tracker }
    }

    /// Read quota, soft limit and usage for the period
    ///
    /// The three reads are issued concurrently; they are not a consistent
    /// snapshot with respect to concurrent increments.
    pub async fn status(&self, period: &Period) -> AppResult<QuotaStatus> {
        let (quota, soft_limit, used) = futures::try_join!(
            self.tracker.user_quota(),
            self.tracker.soft_geocoder_limit(),
            self.tracker.used_quota_month(period),
        )?;

        Ok(QuotaStatus {
            user_id: self.tracker.user_id().to_string(),
            period: *period,
            quota,
            used,
            remaining: quota.saturating_sub(used).max(0),
            soft_limit,
        })
    }

    /// Check the quota for the period and log the decision
    #[instrument(skip(self, period), fields(user_id = %self.tracker.user_id(), period = %period))]
    pub async fn check(&self, period: &Period) -> AppResult<QuotaCheck> {
        let status = self.status(period).await?;
        let allowed = status.allows_request();

        let outcome = match (allowed, status.used >= status.quota) {
            (false, _) => "denied",
            (true, true) => "soft_exceeded",
            (true, false) => "allowed",
        };
        record_quota_check(outcome);

        match outcome {
            "denied" => warn!(quota = status.quota, used = status.used, "Geocoding quota exhausted"),
            "soft_exceeded" => info!(
                quota = status.quota,
                used = status.used,
                "Geocoding quota exceeded under soft limit"
            ),
            _ => {}
        }

        Ok(QuotaCheck { allowed, status })
    }

    /// Whether the user may geocode in the period
    pub async fn check_user_quota(&self, period: &Period) -> AppResult<bool> {
        Ok(self.check(period).await?.allowed)
    }

    /// Record usage in an arbitrary bucket of the period
    pub async fn increment_service_use(
        &self,
        period: &Period,
        bucket: &str,
        amount: i64,
    ) -> AppResult<()> {
        self.tracker
            .increment_geocoder_use(period, bucket, amount)
            .await?;
        record_usage_increment(bucket, amount);
        Ok(())
    }

    /// Record successful geocodings in the current period
    pub async fn increment_success_service_use(&self, amount: i64) -> AppResult<()> {
        self.increment_service_use(&Period::current(), buckets::SUCCESS_RESPONSES, amount)
            .await
    }

    /// Record empty geocodings in the current period
    pub async fn increment_empty_service_use(&self, amount: i64) -> AppResult<()> {
        self.increment_service_use(&Period::current(), buckets::EMPTY_RESPONSES, amount)
            .await
    }

    /// Record failed geocodings in the current period
    pub async fn increment_failed_service_use(&self, amount: i64) -> AppResult<()> {
        self.increment_service_use(&Period::current(), buckets::FAILED_RESPONSES, amount)
            .await
    }
}
