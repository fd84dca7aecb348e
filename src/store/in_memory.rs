//! In-memory quota store for testing
//!
//! This module provides an in-memory store that can be used in place of Redis
//! during testing, eliminating the need for a real Redis instance.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    store::{QuotaStore, ScanPage},
};

/// In-memory store for testing
///
/// Hashes are kept as ordered maps so scan cursors are stable offsets.
/// The store can be switched to "unavailable" to exercise error paths.
///
/// # Thread Safety
///
/// Uses RwLock for interior mutability; increments take the write lock,
/// which makes them atomic with respect to each other.
#[derive(Default)]
pub struct InMemoryStore {
    data: RwLock<HashMap<String, BTreeMap<Vec<u8>, Vec<u8>>>>,
    unavailable: AtomicBool,
    scan_calls: AtomicUsize,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a field value, bypassing increment semantics
    pub fn set_field(&self, key: &str, field: &str, value: &str) {
        self.set_field_bytes(key, field.as_bytes(), value.as_bytes());
    }

    /// Write arbitrary bytes as field name and value
    pub fn set_field_bytes(&self, key: &str, field: &[u8], value: &[u8]) {
        let mut data = self.data.write().unwrap();
        data.entry(key.to_string())
            .or_default()
            .insert(field.to_vec(), value.to_vec());
    }

    /// Read a field value as text
    pub fn field(&self, key: &str, field: &str) -> Option<String> {
        self.field_bytes(key, field)
            .map(|value| String::from_utf8_lossy(&value).into_owned())
    }

    fn field_bytes(&self, key: &str, field: &str) -> Option<Vec<u8>> {
        let data = self.data.read().unwrap();
        data.get(key).and_then(|hash| hash.get(field.as_bytes()).cloned())
    }

    /// Make every subsequent operation fail with a connection error
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of HSCAN round trips served so far
    pub fn scan_calls(&self) -> usize {
        self.scan_calls.load(Ordering::SeqCst)
    }

    /// Clear all entries (useful for test isolation)
    #[allow(dead_code)]
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap();
        data.clear();
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(redis::RedisError::from((
                redis::ErrorKind::IoError,
                "in-memory store marked unavailable",
            ))
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl QuotaStore for InMemoryStore {
    async fn hget(&self, key: &str, field: &str) -> AppResult<Option<Vec<u8>>> {
        self.check_available()?;
        Ok(self.field_bytes(key, field))
    }

    async fn hincr_by(&self, key: &str, field: &str, amount: i64) -> AppResult<i64> {
        self.check_available()?;
        let mut data = self.data.write().unwrap();
        let hash = data.entry(key.to_string()).or_default();

        let current = match hash.get(field.as_bytes()) {
            Some(value) => std::str::from_utf8(value)
                .ok()
                .and_then(|value| value.parse::<i64>().ok())
                .ok_or_else(|| {
                    redis::RedisError::from((
                        redis::ErrorKind::ResponseError,
                        "hash value is not an integer",
                    ))
                })?,
            None => 0,
        };

        let new_value = current.checked_add(amount).ok_or_else(|| {
            redis::RedisError::from((
                redis::ErrorKind::ResponseError,
                "increment or decrement would overflow",
            ))
        })?;
        hash.insert(field.as_bytes().to_vec(), new_value.to_string().into_bytes());
        Ok(new_value)
    }

    async fn hscan(&self, key: &str, cursor: u64, count: usize) -> AppResult<ScanPage> {
        self.check_available()?;
        self.scan_calls.fetch_add(1, Ordering::SeqCst);

        let data = self.data.read().unwrap();
        let Some(hash) = data.get(key) else {
            return Ok(ScanPage::default());
        };

        let start = cursor as usize;
        let entries: Vec<(Vec<u8>, Vec<u8>)> = hash
            .iter()
            .skip(start)
            .take(count.max(1))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect();

        let next = start + entries.len();
        let cursor = if next >= hash.len() { 0 } else { next as u64 };

        Ok(ScanPage { cursor, entries })
    }

    async fn ping(&self) -> AppResult<()> {
        self.check_available()
    }
}
