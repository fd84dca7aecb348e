//! Quota module
//!
//! Tracks per-user geocoding quota and monthly usage in the quota store.

pub mod keys;
pub mod service;
pub mod tracker;

pub use keys::Period;
pub use service::{buckets, QuotaCheck, QuotaService, QuotaStatus};
pub use tracker::{QuotaTracker, StoreConnection};
