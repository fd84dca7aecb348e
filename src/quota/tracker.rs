//! Quota tracker implementation
//!
//! Per-user view over the profile hash and the monthly usage hashes.
//! Reads normalize missing or malformed profile values; every store failure
//! is returned to the caller as [`AppError::Store`].

use std::fmt::Display;

use tracing::{debug, instrument};

use crate::{
    config::ConnectionParams,
    error::{AppError, AppResult},
    quota::keys::{self, fields, Period},
    store::{QuotaStore, RedisStore, DEFAULT_SCAN_COUNT},
};

/// How a tracker obtains its store connection
pub enum StoreConnection<S = RedisStore> {
    /// An existing handle; ownership stays with the caller
    Handle(S),
    /// Parameters for a connection the tracker creates and owns
    Params(ConnectionParams),
}

enum Connection<S> {
    Injected(S),
    Owned(S),
}

impl<S> Connection<S> {
    fn store(&self) -> &S {
        match self {
            Connection::Injected(store) | Connection::Owned(store) => store,
        }
    }
}

/// Usage and quota tracker for one user
pub struct QuotaTracker<S = RedisStore> {
    user_id: String,
    connection: Connection<S>,
    scan_count: usize,
}

impl QuotaTracker<RedisStore> {
    /// Create a tracker from a handle or from connection parameters
    ///
    /// Fails with [`AppError::Configuration`] when parameters are given
    /// without a host.
    pub async fn connect(
        user_id: impl Display,
        connection: StoreConnection<RedisStore>,
    ) -> AppResult<Self> {
        match connection {
            StoreConnection::Handle(store) => Ok(Self::with_store(user_id, store)),
            StoreConnection::Params(params) => {
                let config = params.resolve()?;
                let store = RedisStore::connect(&config).await?;
                Ok(Self {
                    user_id: user_id.to_string(),
                    connection: Connection::Owned(store),
                    scan_count: DEFAULT_SCAN_COUNT,
                })
            }
        }
    }
}

impl<S: QuotaStore> QuotaTracker<S> {
    /// Create a tracker over an externally supplied store handle
    pub fn with_store(user_id: impl Display, store: S) -> Self {
        Self {
            user_id: user_id.to_string(),
            connection: Connection::Injected(store),
            scan_count: DEFAULT_SCAN_COUNT,
        }
    }

    /// Override the number of entries requested per HSCAN round trip
    pub fn with_scan_count(mut self, scan_count: usize) -> Self {
        self.scan_count = scan_count.max(1);
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Whether the tracker created (and therefore owns) its connection
    pub fn is_owned(&self) -> bool {
        matches!(self.connection, Connection::Owned(_))
    }

    /// Underlying store handle, for operations this tracker does not wrap
    pub fn connection(&self) -> &S {
        self.connection.store()
    }

    /// Total geocoding allowance; `0` when absent, malformed or negative
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn user_quota(&self) -> AppResult<i64> {
        let raw = self
            .connection()
            .hget(&keys::user_profile(&self.user_id), fields::GEOCODING_QUOTA)
            .await?;

        let raw = raw.as_deref().and_then(|value| std::str::from_utf8(value).ok());
        let quota = parse_quota(raw);
        debug!(raw = ?raw, quota = quota, "Read user quota");
        Ok(quota)
    }

    /// Whether the user's limit is advisory
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn soft_geocoder_limit(&self) -> AppResult<bool> {
        let raw = self
            .connection()
            .hget(&keys::user_profile(&self.user_id), fields::SOFT_GEOCODER_LIMIT)
            .await?;

        Ok(raw.as_deref() == Some(b"1".as_slice()))
    }

    /// Sum of every usage bucket recorded for the period
    ///
    /// Walks the hash with HSCAN so that an unbounded number of buckets
    /// never has to be loaded in a single reply.
    #[instrument(skip(self, period), fields(user_id = %self.user_id, period = %period))]
    pub async fn used_quota_month(&self, period: &Period) -> AppResult<i64> {
        let key = keys::monthly_usage(&self.user_id, period);
        let mut cursor = 0u64;
        let mut used = 0i64;
        let mut round_trips = 0usize;

        loop {
            let page = self.connection().hscan(&key, cursor, self.scan_count).await?;
            round_trips += 1;

            for (field, value) in page.entries {
                used = std::str::from_utf8(&value)
                    .ok()
                    .and_then(|value| value.trim().parse::<i64>().ok())
                    .and_then(|amount| used.checked_add(amount))
                    .ok_or_else(|| AppError::InvalidCounter {
                        key: key.clone(),
                        field: String::from_utf8_lossy(&field).into_owned(),
                        value: String::from_utf8_lossy(&value).into_owned(),
                    })?;
            }

            if page.cursor == 0 {
                break;
            }
            cursor = page.cursor;
        }

        debug!(used = used, round_trips = round_trips, "Summed monthly usage");
        Ok(used)
    }

    /// Atomically add `amount` to one usage bucket of the period
    #[instrument(skip(self, period), fields(user_id = %self.user_id, period = %period))]
    pub async fn increment_geocoder_use(
        &self,
        period: &Period,
        key: &str,
        amount: i64,
    ) -> AppResult<()> {
        if amount < 0 {
            return Err(AppError::BadRequest(format!(
                "usage increments must be non-negative, got {}",
                amount
            )));
        }

        let value = self
            .connection()
            .hincr_by(&keys::monthly_usage(&self.user_id, period), key, amount)
            .await?;

        debug!(bucket = %key, amount = amount, value = value, "Incremented geocoder usage");
        Ok(())
    }

    /// Increment a usage bucket by one
    pub async fn increment_geocoder_use_by_one(&self, period: &Period, key: &str) -> AppResult<()> {
        self.increment_geocoder_use(period, key, 1).await
    }
}

fn parse_quota(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|quota| *quota >= 0)
        .unwrap_or(0)
}
