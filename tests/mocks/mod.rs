//! Mock infrastructure for testing external services
//!
//! This module provides mock servers and test helpers for external dependencies:
//! - Matrix API (one-to-many time/distance)
//! - Redis (quota records)

pub mod matrix;
pub mod redis;

#[allow(unused_imports)]
pub use self::matrix::*;
#[allow(unused_imports)]
pub use self::redis::*;
