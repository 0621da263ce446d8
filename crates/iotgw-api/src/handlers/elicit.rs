//! Elicitation handler

use axum::extract::State;
use axum::Json;
use iotgw_core::ElicitationReport;
use serde::Deserialize;

use crate::state::AppState;

/// Elicitation request body
#[derive(Debug, Deserialize)]
pub struct ElicitRequest {
    /// Task name
    pub task: String,
    /// Parameters gathered so far; only the keys matter
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

/// Report which parameters a task still needs
///
/// POST /v1/elicit
pub async fn elicit(
    State(state): State<AppState>,
    Json(request): Json<ElicitRequest>,
) -> Json<ElicitationReport> {
    let report = state
        .checker
        .check(&request.task, request.params.keys().map(String::as_str));
    Json(report)
}
