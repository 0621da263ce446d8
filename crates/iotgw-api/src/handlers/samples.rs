//! Manual sample handlers

use axum::extract::State;
use axum::Json;
use iotgw_core::SensorReading;
use iotgw_gateway::{SampleAck, SampleSummary};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Stored samples
#[derive(Debug, Serialize)]
pub struct SampleList {
    pub count: usize,
    pub samples: Vec<SensorReading>,
}

/// Result of clearing the store
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: usize,
    pub message: String,
}

/// POST /v1/samples
pub async fn record_sample(
    State(state): State<AppState>,
    Json(reading): Json<SensorReading>,
) -> Result<Json<SampleAck>, ApiError> {
    if reading.is_empty() {
        return Err(ApiError::BadRequest(
            "Sample must contain at least one numeric field".to_string(),
        ));
    }
    Ok(Json(state.samples.record(reading)))
}

/// GET /v1/samples
pub async fn list_samples(State(state): State<AppState>) -> Json<SampleList> {
    let samples = state.samples.list();
    Json(SampleList {
        count: samples.len(),
        samples,
    })
}

/// DELETE /v1/samples
pub async fn clear_samples(State(state): State<AppState>) -> Json<ClearResponse> {
    let cleared = state.samples.clear();
    Json(ClearResponse {
        cleared,
        message: "Sample buffer cleared.".to_string(),
    })
}

/// GET /v1/samples/summary
pub async fn summarize_samples(
    State(state): State<AppState>,
) -> Result<Json<SampleSummary>, ApiError> {
    state
        .samples
        .summary()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No samples available".to_string()))
}
