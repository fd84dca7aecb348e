//! Quota endpoints
//!
//! - `GET /v1/users/:user_id/quota` - Quota status for a period
//! - `POST /v1/users/:user_id/quota/check` - Quota decision for a period
//! - `POST /v1/users/:user_id/usage` - Record usage in a bucket
//!
//! The period is given as `YYYYMM` and defaults to the current month.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    quota::{Period, QuotaCheck, QuotaService, QuotaStatus, QuotaTracker},
    store::SharedStore,
    AppState,
};

/// Query string carrying an optional period
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

/// Body of a usage increment
#[derive(Debug, Deserialize)]
pub struct UsageRequest {
    /// Usage bucket to increment
    pub key: String,
    /// Defaults to 1
    pub amount: Option<i64>,
    pub period: Option<String>,
}

fn resolve_period(period: Option<&str>) -> AppResult<Period> {
    match period {
        Some(p) => p.parse(),
        None => Ok(Period::current()),
    }
}

/// Trackers borrow the shared store handle and never own it
fn quota_service(state: &AppState, user_id: &str) -> QuotaService<SharedStore> {
    QuotaService::new(QuotaTracker::with_store(user_id, state.store.clone()))
}

/// Quota status for a user
pub async fn get_quota(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<QuotaStatus>> {
    let period = resolve_period(query.period.as_deref())?;
    let status = quota_service(&state, &user_id).status(&period).await?;
    Ok(Json(status))
}

/// Quota decision for a user
pub async fn check_quota(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<QuotaCheck>> {
    let period = resolve_period(query.period.as_deref())?;
    let check = quota_service(&state, &user_id).check(&period).await?;
    Ok(Json(check))
}

/// Record usage and return the updated status
pub async fn record_usage(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(request): Json<UsageRequest>,
) -> AppResult<Json<QuotaStatus>> {
    let period = resolve_period(request.period.as_deref())?;
    let service = quota_service(&state, &user_id);

    service
        .increment_service_use(&period, &request.key, request.amount.unwrap_or(1))
        .await?;

    Ok(Json(service.status(&period).await?))
}
