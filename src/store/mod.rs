//! Quota store module
//!
//! Defines the minimal hash primitives the quota tracker needs from the
//! key-value store, with a Redis implementation and an in-memory one for tests.

pub mod redis;

#[cfg(any(test, feature = "test-utils"))]
pub mod in_memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppResult;

pub use self::redis::RedisStore;

#[cfg(any(test, feature = "test-utils"))]
pub use self::in_memory::InMemoryStore;

/// Default number of hash entries requested per HSCAN round trip
pub const DEFAULT_SCAN_COUNT: usize = 100;

/// One page of an incremental hash scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    /// Cursor for the next page; `0` once the scan is complete
    pub cursor: u64,
    /// Raw field/value pairs returned by this page
    pub entries: Vec<(Vec<u8>, Vec<u8>)>,
}

/// Hash primitives required from the quota store
///
/// Every method is a single round trip. Implementations must make
/// [`QuotaStore::hincr_by`] atomic on the store side. Values are returned as
/// raw bytes; decoding them is left to the caller.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    /// Read one field of the hash at `key`
    async fn hget(&self, key: &str, field: &str) -> AppResult<Option<Vec<u8>>>;

    /// Atomically add `amount` to a hash field, creating hash and field if absent
    async fn hincr_by(&self, key: &str, field: &str, amount: i64) -> AppResult<i64>;

    /// Fetch the next page of field/value pairs of the hash at `key`
    async fn hscan(&self, key: &str, cursor: u64, count: usize) -> AppResult<ScanPage>;

    /// Check connectivity
    async fn ping(&self) -> AppResult<()>;
}

#[async_trait]
impl<S: QuotaStore + ?Sized> QuotaStore for Arc<S> {
    async fn hget(&self, key: &str, field: &str) -> AppResult<Option<Vec<u8>>> {
        (**self).hget(key, field).await
    }

    async fn hincr_by(&self, key: &str, field: &str, amount: i64) -> AppResult<i64> {
        (**self).hincr_by(key, field, amount).await
    }

    async fn hscan(&self, key: &str, cursor: u64, count: usize) -> AppResult<ScanPage> {
        (**self).hscan(key, cursor, count).await
    }

    async fn ping(&self) -> AppResult<()> {
        (**self).ping().await
    }
}

/// Store handle shared across request handlers
pub type SharedStore = Arc<dyn QuotaStore>;
