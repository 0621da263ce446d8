//! iotgwd - Telemetry Gateway Daemon
//!
//! Serves the gateway HTTP API: bus reads, protocol discovery, elicitation,
//! manual samples and platform publishing.
//!
//! Usage:
//!   iotgwd [OPTIONS]
//!
//! If no config file is provided, a mock bus and default settings are used.

mod config;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use iotgw_api::{create_router, AppState};
use iotgw_bus::BusReader;
use iotgw_core::CompletenessChecker;
use iotgw_gateway::{ProtocolProber, PublishDispatcher, SampleStore};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::GatewayConfig;

const DEFAULT_LOG_FILTER: &str = "iotgwd=info,iotgw_api=info,iotgw_gateway=info,iotgw_bus=debug";

#[derive(Parser)]
#[command(name = "iotgwd")]
#[command(author, version, about = "Telemetry gateway daemon")]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "IOTGW_CONFIG")]
    config: Option<PathBuf>,

    /// Listen port (overrides the config file)
    #[arg(short, long, env = "IOTGW_PORT")]
    port: Option<u16>,

    /// Listen address (overrides the config file)
    #[arg(short, long, env = "IOTGW_BIND")]
    bind: Option<IpAddr>,

    /// Emit logs as JSON lines
    #[arg(long, env = "IOTGW_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_json);

    tracing::info!("Starting iotgwd (Telemetry Gateway Daemon)");

    let config = match &args.config {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading config");
            GatewayConfig::load(path)?
        }
        None => {
            tracing::info!("No config file provided, using mock bus");
            GatewayConfig::demo()
        }
    };

    let checker = CompletenessChecker::new(config.task_requirements());
    let prober = ProtocolProber::new(config.probe.clone())?;
    let mut state = AppState::new(PublishDispatcher::new(), prober, checker)
        .with_samples(SampleStore::with_capacity(config.samples.capacity));

    match &config.bus {
        Some(bus_config) => {
            let reader = BusReader::open(bus_config)
                .await
                .context("Failed to open bus")?;
            tracing::info!(interface = %reader.interface(), "Bus opened");
            state = state.with_bus(Arc::new(reader));
        }
        None => tracing::info!("No bus configured, bus reads are disabled"),
    }

    let app = create_router(state);

    let addr = SocketAddr::new(
        args.bind.unwrap_or(config.server.bind),
        args.port.unwrap_or(config.server.port),
    );
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

fn init_logging(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
