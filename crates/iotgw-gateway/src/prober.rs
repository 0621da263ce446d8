//! Protocol discovery by active probing
//!
//! Every probe is independent: an HTTP OPTIONS for plain REST, GETs against
//! well-known API description paths for OpenAPI, and TCP connects for MQTT,
//! MQTT-over-TLS and CoAP. Probes run concurrently, each with its own
//! timeout, under one shared discovery deadline. A failed probe only means
//! "protocol not confirmed"; discovery itself never fails.
//!
//! The CoAP probe only detects a TCP listener on the CoAP port. It does not
//! speak CoAP (which is normally UDP).

use std::time::Duration;

use iotgw_core::{
    DiscoveryResult, GatewayError, GatewayResult, ProbeOutcome, ProbeReport, ProtocolTag,
};
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Redirect hops followed by the HTTP probes
const MAX_REDIRECTS: usize = 5;

/// Probe timeouts, ports and description paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Timeout for each HTTP request (milliseconds)
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,
    /// Timeout for each TCP connect (milliseconds)
    #[serde(default = "default_tcp_timeout_ms")]
    pub tcp_timeout_ms: u64,
    /// Deadline for the whole discovery run (milliseconds)
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,
    #[serde(default = "default_mqtt_port")]
    pub mqtt_port: u16,
    #[serde(default = "default_mqtts_port")]
    pub mqtts_port: u16,
    #[serde(default = "default_coap_port")]
    pub coap_port: u16,
    /// Paths tried for an OpenAPI/Swagger description
    #[serde(default = "default_description_paths")]
    pub description_paths: Vec<String>,
}

fn default_http_timeout_ms() -> u64 {
    3000
}

fn default_tcp_timeout_ms() -> u64 {
    2000
}

fn default_deadline_ms() -> u64 {
    5000
}

fn default_mqtt_port() -> u16 {
    1883
}

fn default_mqtts_port() -> u16 {
    8883
}

fn default_coap_port() -> u16 {
    5683
}

fn default_description_paths() -> Vec<String> {
    ["/swagger.json", "/openapi.json", "/api", "/api/docs"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            http_timeout_ms: default_http_timeout_ms(),
            tcp_timeout_ms: default_tcp_timeout_ms(),
            deadline_ms: default_deadline_ms(),
            mqtt_port: default_mqtt_port(),
            mqtts_port: default_mqtts_port(),
            coap_port: default_coap_port(),
            description_paths: default_description_paths(),
        }
    }
}

/// Discovers which protocols an endpoint accepts
#[derive(Debug, Clone)]
pub struct ProtocolProber {
    config: ProbeConfig,
    client: Client,
}

/// One planned probe
enum Probe {
    Options { url: String },
    Description { url: String },
    Tcp { protocol: ProtocolTag, host: String, port: u16 },
}

impl Probe {
    fn protocol(&self) -> ProtocolTag {
        match self {
            Probe::Options { .. } => ProtocolTag::HttpRest,
            Probe::Description { .. } => ProtocolTag::OpenApiRest,
            Probe::Tcp { protocol, .. } => *protocol,
        }
    }

    fn target(&self) -> String {
        match self {
            Probe::Options { url } | Probe::Description { url } => url.clone(),
            Probe::Tcp { host, port, .. } => format!("{}:{}", host, port),
        }
    }
}

impl ProtocolProber {
    /// Create a prober with the given configuration
    pub fn new(config: ProbeConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(Duration::from_millis(config.http_timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .no_proxy()
            .build()
            .map_err(|e| GatewayError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Probe `endpoint` and report the confirmed protocols.
    ///
    /// Never fails: unreachable hosts, timeouts and malformed endpoints all
    /// show up as per-probe outcomes and an empty protocol set.
    #[instrument(skip(self))]
    pub async fn discover(&self, endpoint: &str) -> DiscoveryResult {
        let endpoint = endpoint.trim();
        let (probes, mut reports) = self.plan(endpoint);

        let tcp_timeout = Duration::from_millis(self.config.tcp_timeout_ms);
        let targets: Vec<(ProtocolTag, String)> =
            probes.iter().map(|p| (p.protocol(), p.target())).collect();

        let mut set = JoinSet::new();
        for (index, probe) in probes.into_iter().enumerate() {
            let client = self.client.clone();
            set.spawn(async move { (index, run_probe(&client, probe, tcp_timeout).await) });
        }

        let mut outcomes: Vec<Option<ProbeOutcome>> = vec![None; targets.len()];
        let deadline =
            tokio::time::Instant::now() + Duration::from_millis(self.config.deadline_ms);

        loop {
            match tokio::time::timeout_at(deadline, set.join_next()).await {
                Ok(Some(Ok((index, outcome)))) => outcomes[index] = Some(outcome),
                Ok(Some(Err(e))) => warn!(error = %e, "Probe task failed"),
                Ok(None) => break,
                Err(_) => {
                    debug!(
                        remaining = set.len(),
                        "Discovery deadline reached, cancelling remaining probes"
                    );
                    set.abort_all();
                    break;
                }
            }
        }

        for ((protocol, target), outcome) in targets.into_iter().zip(outcomes) {
            reports.push(ProbeReport {
                protocol,
                target,
                outcome: outcome.unwrap_or(ProbeOutcome::TimedOut),
            });
        }

        let result = DiscoveryResult::from_reports(endpoint, reports);
        info!(
            endpoint = %endpoint,
            protocols = ?result.protocols,
            "Protocol discovery complete"
        );
        result
    }

    /// Build the probe list; endpoint errors become reports straight away
    fn plan(&self, endpoint: &str) -> (Vec<Probe>, Vec<ProbeReport>) {
        let mut probes = Vec::new();
        let mut reports = Vec::new();

        match http_base(endpoint) {
            Ok(base) => {
                probes.push(Probe::Options { url: base.clone() });
                for path in &self.config.description_paths {
                    probes.push(Probe::Description {
                        url: format!("{}{}", base.trim_end_matches('/'), path),
                    });
                }
            }
            Err(reason) => {
                for protocol in [ProtocolTag::HttpRest, ProtocolTag::OpenApiRest] {
                    reports.push(invalid(protocol, endpoint, &reason));
                }
            }
        }

        let ports = [
            (ProtocolTag::Mqtt, self.config.mqtt_port),
            (ProtocolTag::Mqtts, self.config.mqtts_port),
            (ProtocolTag::Coap, self.config.coap_port),
        ];
        match endpoint_host(endpoint) {
            Ok(host) => {
                for (protocol, port) in ports {
                    probes.push(Probe::Tcp {
                        protocol,
                        host: host.clone(),
                        port,
                    });
                }
            }
            Err(reason) => {
                for (protocol, _) in ports {
                    reports.push(invalid(protocol, endpoint, &reason));
                }
            }
        }

        (probes, reports)
    }
}

fn invalid(protocol: ProtocolTag, endpoint: &str, reason: &str) -> ProbeReport {
    ProbeReport {
        protocol,
        target: endpoint.to_string(),
        outcome: ProbeOutcome::InvalidEndpoint {
            reason: reason.to_string(),
        },
    }
}

async fn run_probe(client: &Client, probe: Probe, tcp_timeout: Duration) -> ProbeOutcome {
    match probe {
        Probe::Options { url } => match client.request(Method::OPTIONS, &url).send().await {
            // Any response at all means something speaks HTTP there
            Ok(_) => ProbeOutcome::Confirmed,
            Err(e) => classify_http_error(&e),
        },
        Probe::Description { url } => match client.get(&url).send().await {
            Ok(resp) if resp.status() == StatusCode::OK => ProbeOutcome::Confirmed,
            Ok(resp) => ProbeOutcome::Absent {
                status: Some(resp.status().as_u16()),
            },
            Err(e) => classify_http_error(&e),
        },
        Probe::Tcp { host, port, .. } => {
            match tokio::time::timeout(tcp_timeout, TcpStream::connect((host.as_str(), port)))
                .await
            {
                Ok(Ok(stream)) => {
                    drop(stream);
                    ProbeOutcome::Confirmed
                }
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::ConnectionRefused => {
                    ProbeOutcome::ConnectionRefused
                }
                Ok(Err(e)) => ProbeOutcome::Unreachable {
                    reason: e.to_string(),
                },
                Err(_) => ProbeOutcome::TimedOut,
            }
        }
    }
}

fn classify_http_error(err: &reqwest::Error) -> ProbeOutcome {
    if err.is_timeout() {
        return ProbeOutcome::TimedOut;
    }
    if io_error_kind(err) == Some(std::io::ErrorKind::ConnectionRefused) {
        return ProbeOutcome::ConnectionRefused;
    }
    if err.is_builder() {
        return ProbeOutcome::InvalidEndpoint {
            reason: err.to_string(),
        };
    }
    ProbeOutcome::Unreachable {
        reason: err.to_string(),
    }
}

/// Kind of the innermost `io::Error` in an error's source chain
fn io_error_kind(err: &(dyn std::error::Error + 'static)) -> Option<std::io::ErrorKind> {
    let mut source = Some(err);
    while let Some(e) = source {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            return Some(io.kind());
        }
        source = e.source();
    }
    None
}

/// Base URL for the HTTP probes; endpoints without a scheme get `http://`
fn http_base(endpoint: &str) -> Result<String, String> {
    let candidate = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else if endpoint.contains("://") {
        return Err(format!("'{}' is not an HTTP endpoint", endpoint));
    } else {
        format!("http://{}", endpoint)
    };

    let url = Url::parse(&candidate).map_err(|e| format!("invalid URL '{}': {}", endpoint, e))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(format!("no host in '{}'", endpoint));
    }

    Ok(candidate)
}

/// Host part of an endpoint address.
///
/// Strips a leading scheme, any user info, path, query, port and IPv6
/// brackets.
///
/// ```
/// # use iotgw_gateway::endpoint_host;
/// assert_eq!(endpoint_host("https://demo.thingsboard.io/api").unwrap(), "demo.thingsboard.io");
/// assert_eq!(endpoint_host("broker.local:1883").unwrap(), "broker.local");
/// assert_eq!(endpoint_host("http://[::1]:8080/").unwrap(), "::1");
/// assert!(endpoint_host("http:///path").is_err());
/// ```
pub fn endpoint_host(endpoint: &str) -> Result<String, String> {
    let rest = match endpoint.find("://") {
        Some(idx) => &endpoint[idx + 3..],
        None => endpoint,
    };

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let authority = authority.rsplit('@').next().unwrap_or_default();

    let host = match authority.strip_prefix('[') {
        Some(bracketed) => bracketed
            .split(']')
            .next()
            .ok_or_else(|| format!("unterminated IPv6 literal in '{}'", endpoint))?,
        None => authority.split(':').next().unwrap_or_default(),
    };

    if host.is_empty() {
        return Err(format!("no host in '{}'", endpoint));
    }
    if host.chars().any(char::is_whitespace) {
        return Err(format!("host contains whitespace in '{}'", endpoint));
    }

    Ok(host.to_string())
}
