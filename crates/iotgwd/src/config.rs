//! Daemon configuration file

use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use anyhow::{Context, Result};
use iotgw_bus::BusConfig;
use iotgw_core::{TaskRequirement, TaskRequirements};
use iotgw_gateway::{ProbeConfig, DEFAULT_SAMPLE_CAPACITY};
use serde::Deserialize;

/// Top-level daemon configuration
///
/// ```toml
/// [server]
/// port = 18090
///
/// [bus]
/// default_timeout_ms = 5000
///
/// [bus.transport]
/// type = "socketcan"
/// interface = "can0"
///
/// [probe]
/// deadline_ms = 3000
///
/// [samples]
/// capacity = 5000
///
/// [[tasks]]
/// name = "calibrate_sensor"
/// requirements = [{ field = "sensor_id", prompt = "Which sensor should be calibrated?" }]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Bus to read from; no bus when absent
    #[serde(default)]
    pub bus: Option<BusConfig>,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub samples: SampleConfig,
    /// Extra elicitation tasks; a task named like a built-in one replaces it
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    18090
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

/// Manual sample buffer settings
#[derive(Debug, Clone, Deserialize)]
pub struct SampleConfig {
    /// Samples kept before the oldest are evicted
    #[serde(default = "default_sample_capacity")]
    pub capacity: usize,
}

fn default_sample_capacity() -> usize {
    DEFAULT_SAMPLE_CAPACITY
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            capacity: default_sample_capacity(),
        }
    }
}

/// One configured elicitation task
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    pub name: String,
    pub requirements: Vec<TaskRequirement>,
}

impl GatewayConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Configuration used when no file is given: defaults plus a mock bus
    pub fn demo() -> Self {
        Self {
            bus: Some(BusConfig::default()),
            ..Self::default()
        }
    }

    /// Built-in tasks overlaid with the configured ones
    pub fn task_requirements(&self) -> TaskRequirements {
        self.tasks
            .iter()
            .fold(TaskRequirements::builtin(), |reqs, task| {
                reqs.with_task(task.name.clone(), task.requirements.clone())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("");
        let config = GatewayConfig::load(file.path()).unwrap();

        assert_eq!(config.server.port, 18090);
        assert!(config.bus.is_none());
        assert_eq!(config.probe.mqtt_port, 1883);
        assert!(config.tasks.is_empty());
        assert_eq!(config.samples.capacity, 10_000);
    }

    #[test]
    fn test_full_config() {
        let file = write_config(
            r#"
            [server]
            bind = "127.0.0.1"
            port = 9000

            [bus]
            default_timeout_ms = 2500

            [bus.transport]
            type = "mock"
            frames = [{ id = "0x101", data = [12] }]

            [probe]
            deadline_ms = 1500
            coap_port = 15683

            [samples]
            capacity = 250

            [[tasks]]
            name = "discover_protocols"
            requirements = [
                { field = "endpoint", prompt = "Which device should be probed?" },
                { field = "timeout_ms", prompt = "How long may probing take?" },
            ]
            "#,
        );
        let config = GatewayConfig::load(file.path()).unwrap();

        assert_eq!(config.server.bind, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.bus.as_ref().unwrap().default_timeout_ms, 2500);
        assert_eq!(config.probe.deadline_ms, 1500);
        assert_eq!(config.probe.coap_port, 15683);
        assert_eq!(config.samples.capacity, 250);

        let reqs = config.task_requirements();
        let discover = reqs.get("discover_protocols").unwrap();
        assert_eq!(discover.len(), 2);
        assert_eq!(discover[0].prompt, "Which device should be probed?");
        // Built-ins that were not overridden remain
        assert!(reqs.get("publish_sensor_data").is_some());
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let file = write_config("[server]\nport = \"not a number\"\n");
        let err = GatewayConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(GatewayConfig::load(Path::new("/nonexistent/iotgwd.toml")).is_err());
    }

    #[test]
    fn test_demo_has_mock_bus() {
        assert!(GatewayConfig::demo().bus.is_some());
    }
}
