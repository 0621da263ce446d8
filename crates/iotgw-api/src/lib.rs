//! iotgw-api - HTTP API for the unified telemetry gateway
//!
//! Exposes publishing, protocol discovery, elicitation, bus reads, manual
//! samples and analysis as JSON endpoints over a shared [`AppState`].
//!
//! # Usage
//!
//! ```ignore
//! use iotgw_api::{create_router, AppState};
//!
//! let state = AppState::new(dispatcher, prober, checker).with_bus(reader);
//! let router = create_router(state);
//! axum::serve(listener, router).await?;
//! ```

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the gateway REST API router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        .route("/v1/metadata", get(handlers::metadata::metadata))
        // Publishing
        .route("/v1/publish", post(handlers::publish::publish))
        // Discovery and elicitation
        .route("/v1/discover", get(handlers::discovery::discover))
        .route("/v1/elicit", post(handlers::elicit::elicit))
        // Bus
        .route("/v1/bus/read", get(handlers::bus::read_bus))
        // Manual samples
        .route(
            "/v1/samples",
            get(handlers::samples::list_samples)
                .post(handlers::samples::record_sample)
                .delete(handlers::samples::clear_samples),
        )
        .route(
            "/v1/samples/summary",
            get(handlers::samples::summarize_samples),
        )
        .route("/v1/analyze", post(handlers::analyze::analyze_reading))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
