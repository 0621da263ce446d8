//! Protocol discovery handler

use axum::extract::{Query, State};
use axum::Json;
use iotgw_core::DiscoveryResult;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Discovery query parameters
#[derive(Debug, Deserialize)]
pub struct DiscoverQuery {
    /// URL or host to probe
    pub endpoint: Option<String>,
}

/// Probe an endpoint for supported protocols
///
/// GET /v1/discover?endpoint=http://device.local
pub async fn discover(
    State(state): State<AppState>,
    Query(query): Query<DiscoverQuery>,
) -> Result<Json<DiscoveryResult>, ApiError> {
    let endpoint = query
        .endpoint
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| {
            ApiError::BadRequest("Provide the endpoint URL or host to probe.".to_string())
        })?;

    Ok(Json(state.prober.discover(endpoint).await))
}
