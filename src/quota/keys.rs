//! Quota record keys
//!
//! Key layout in the store:
//! - `geocoder:{user_id}`: profile hash (quota, soft limit flag)
//! - `geocoder:{user_id}:{year}{month}`: monthly usage hash, one field per bucket

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Utc};
use serde::{Serialize, Serializer};

use crate::error::{AppError, AppResult};

/// Field names inside the profile hash
pub mod fields {
    /// Total geocoding allowance
    pub const GEOCODING_QUOTA: &str = "geocoding_quota";
    /// `"1"` when the limit is advisory
    pub const SOFT_GEOCODER_LIMIT: &str = "soft_geocoder_limit";
}

/// Profile hash key
pub fn user_profile(user_id: &str) -> String {
    format!("geocoder:{}", user_id)
}

/// Monthly usage hash key
pub fn monthly_usage(user_id: &str, period: &Period) -> String {
    format!("geocoder:{}:{}", user_id, period)
}

/// A billing period (year, month)
///
/// Always rendered as `{year}{month:02}` so that month 3 and month "03"
/// address the same usage record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Create a period, validating the month
    pub fn new(year: i32, month: u32) -> AppResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(AppError::BadRequest(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        if !(0..=9999).contains(&year) {
            return Err(AppError::BadRequest(format!(
                "year must have at most four digits, got {}",
                year
            )));
        }
        Ok(Self { year, month })
    }

    /// Period containing the current UTC date
    pub fn current() -> Self {
        let today = Utc::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    /// Build a period from textual year and month (`"2024"`, `"3"` or `"03"`)
    pub fn from_parts(year: &str, month: &str) -> AppResult<Self> {
        let year = year
            .trim()
            .parse()
            .map_err(|_| AppError::BadRequest(format!("invalid year: {:?}", year)))?;
        let month = month
            .trim()
            .parse()
            .map_err(|_| AppError::BadRequest(format!("invalid month: {:?}", month)))?;
        Self::new(year, month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", self.year, self.month)
    }
}

/// Parses `YYYYMM` or `YYYY-MM`
impl FromStr for Period {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((year, month)) = s.split_once('-') {
            return Self::from_parts(year, month);
        }
        if s.len() == 6 && s.is_char_boundary(4) {
            return Self::from_parts(&s[..4], &s[4..]);
        }
        Err(AppError::BadRequest(format!(
            "invalid period {:?}, expected YYYYMM",
            s
        )))
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
