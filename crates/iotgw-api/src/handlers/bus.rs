//! Bus read handler

use std::time::Duration;

use axum::extract::{Query, State};
use axum::Json;
use iotgw_bus::BusRead;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Upper bound for a single poll
const MAX_TIMEOUT_MS: u64 = 60_000;

/// Bus read query parameters
#[derive(Debug, Deserialize)]
pub struct BusReadQuery {
    /// Poll timeout; the configured default when absent
    pub timeout_ms: Option<u64>,
}

/// Wait for the next frame and decode it
///
/// GET /v1/bus/read?timeout_ms=2000
pub async fn read_bus(
    State(state): State<AppState>,
    Query(query): Query<BusReadQuery>,
) -> Result<Json<BusRead>, ApiError> {
    let reader = state.bus()?;

    let timeout = match query.timeout_ms {
        Some(ms) if ms > MAX_TIMEOUT_MS => {
            return Err(ApiError::BadRequest(format!(
                "timeout_ms must not exceed {}",
                MAX_TIMEOUT_MS
            )))
        }
        Some(ms) => Some(Duration::from_millis(ms)),
        None => None,
    };

    Ok(Json(reader.read(timeout).await?))
}
