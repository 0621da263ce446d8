//! Gateway metadata handler

use axum::extract::State;
use axum::Json;
use iotgw_core::{Platform, ProtocolTag};
use serde::Serialize;

use crate::state::AppState;

/// What this gateway can do
#[derive(Debug, Serialize)]
pub struct Metadata {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    /// Tasks known to the elicitation checker
    pub tasks: Vec<String>,
    /// Routable publish platforms
    pub platforms: Vec<Platform>,
    /// Protocols the prober looks for
    pub protocols: Vec<ProtocolTag>,
    /// Bus interface, if a bus is attached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus: Option<String>,
}

/// GET /v1/metadata
pub async fn metadata(State(state): State<AppState>) -> Json<Metadata> {
    Json(Metadata {
        name: "iotgw",
        version: env!("CARGO_PKG_VERSION"),
        description: "Telemetry gateway: sampling, elicitation, protocol discovery, bus decoding and platform publishing",
        tasks: state
            .checker
            .requirements()
            .task_names()
            .map(str::to_string)
            .collect(),
        platforms: state.dispatcher.platforms(),
        protocols: ProtocolTag::ALL.to_vec(),
        bus: state
            .bus()
            .ok()
            .map(|reader| reader.interface().to_string()),
    })
}
