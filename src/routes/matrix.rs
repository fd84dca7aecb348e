//! Time/distance matrix proxy endpoint
//!
//! `POST /v1/matrix/one_to_many` forwards a single origin, its destinations
//! and a costing profile to the matrix service and returns its answer. Fields
//! outside the typed response model are passed through untouched.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    matrix::{Costing, Location, MatrixResponse},
    AppState,
};

/// One-to-many matrix request body
#[derive(Debug, Deserialize)]
pub struct OneToManyRequest {
    pub origin: Location,
    pub destinations: Vec<Location>,
    pub costing: Costing,
}

/// Proxy a one-to-many matrix request
pub async fn one_to_many(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OneToManyRequest>,
) -> AppResult<Json<MatrixResponse>> {
    let client = state
        .matrix_client
        .as_ref()
        .ok_or_else(|| AppError::NotFound("matrix service is not configured".to_string()))?;

    let response = client
        .one_to_many(request.origin, &request.destinations, request.costing)
        .await?;

    Ok(Json(response))
}
