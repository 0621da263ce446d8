//! Reading analysis handler

use axum::Json;
use iotgw_core::SensorReading;
use iotgw_gateway::{analyze, Analysis};

/// POST /v1/analyze
pub async fn analyze_reading(Json(reading): Json<SensorReading>) -> Json<Analysis> {
    Json(analyze(&reading))
}
