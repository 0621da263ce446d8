//! Protocol discovery models

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire protocol a target endpoint may speak.
///
/// The serialized names are part of the external interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProtocolTag {
    #[serde(rename = "http-rest")]
    HttpRest,
    #[serde(rename = "openapi-rest")]
    OpenApiRest,
    #[serde(rename = "mqtt")]
    Mqtt,
    #[serde(rename = "mqtts")]
    Mqtts,
    #[serde(rename = "coap")]
    Coap,
}

impl ProtocolTag {
    /// Every tag the prober can report
    pub const ALL: [ProtocolTag; 5] = [
        ProtocolTag::HttpRest,
        ProtocolTag::OpenApiRest,
        ProtocolTag::Mqtt,
        ProtocolTag::Mqtts,
        ProtocolTag::Coap,
    ];

    /// Wire name of this tag
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolTag::HttpRest => "http-rest",
            ProtocolTag::OpenApiRest => "openapi-rest",
            ProtocolTag::Mqtt => "mqtt",
            ProtocolTag::Mqtts => "mqtts",
            ProtocolTag::Coap => "coap",
        }
    }
}

impl fmt::Display for ProtocolTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// Protocol confirmed
    Confirmed,
    /// Endpoint answered but not in a way that confirms the protocol
    Absent {
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
    },
    /// No answer within the probe timeout or the discovery deadline
    TimedOut,
    /// Host actively refused the connection
    ConnectionRefused,
    /// Host could not be reached (DNS failure, network unreachable, ...)
    Unreachable { reason: String },
    /// Endpoint string could not be turned into a probe target
    InvalidEndpoint { reason: String },
}

impl ProbeOutcome {
    /// True for [`ProbeOutcome::Confirmed`]
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ProbeOutcome::Confirmed)
    }
}

/// Report for one probe of a discovery run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    /// Protocol this probe tests for
    pub protocol: ProtocolTag,
    /// What was probed (URL or host:port)
    pub target: String,
    /// What happened
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
}

/// Protocols confirmed for an endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryResult {
    /// Endpoint as given by the caller
    pub endpoint: String,
    /// Confirmed protocols, deduplicated
    pub protocols: BTreeSet<ProtocolTag>,
    /// Individual probe reports
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub probes: Vec<ProbeReport>,
}

impl DiscoveryResult {
    /// Build a result from probe reports; only confirmed probes add tags
    pub fn from_reports(endpoint: impl Into<String>, probes: Vec<ProbeReport>) -> Self {
        let protocols = probes
            .iter()
            .filter(|p| p.outcome.is_confirmed())
            .map(|p| p.protocol)
            .collect();

        Self {
            endpoint: endpoint.into(),
            protocols,
            probes,
        }
    }

    /// True if the protocol was confirmed
    pub fn supports(&self, protocol: ProtocolTag) -> bool {
        self.protocols.contains(&protocol)
    }
}
