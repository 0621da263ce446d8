//! Publish handler

use axum::extract::State;
use axum::Json;
use iotgw_core::{PublishOutcome, PublishRequest};

use crate::error::ApiError;
use crate::state::AppState;

/// Publish a reading to an IoT platform
///
/// POST /v1/publish
///
/// Incomplete requests and unknown platforms answer 200 with the matching
/// `status`; a failing sink answers 502.
pub async fn publish(
    State(state): State<AppState>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<PublishOutcome>, ApiError> {
    let outcome = state.dispatcher.publish(request).await?;
    Ok(Json(outcome))
}
