//! IoT platform identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target IoT platform for a publish.
///
/// The four built-in platforms are a closed set; anything else is carried
/// as [`Platform::Custom`] and resolved against the dispatcher's
/// registered-sink table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    ThingsBoard,
    ThingSpeak,
    CustomRest,
    CustomMqtt,
    /// Caller-defined platform name (lowercased)
    Custom(String),
}

impl Platform {
    /// Built-in platforms
    pub const BUILTIN: [Platform; 4] = [
        Platform::ThingsBoard,
        Platform::ThingSpeak,
        Platform::CustomRest,
        Platform::CustomMqtt,
    ];

    /// Wire name of this platform
    pub fn as_str(&self) -> &str {
        match self {
            Platform::ThingsBoard => "thingsboard",
            Platform::ThingSpeak => "thingspeak",
            Platform::CustomRest => "custom_rest",
            Platform::CustomMqtt => "custom_mqtt",
            Platform::Custom(name) => name,
        }
    }

    /// True for one of the statically known platforms
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Platform::Custom(_))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Platform {
    fn from(s: &str) -> Self {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "thingsboard" => Platform::ThingsBoard,
            "thingspeak" => Platform::ThingSpeak,
            "custom_rest" => Platform::CustomRest,
            "custom_mqtt" => Platform::CustomMqtt,
            _ => Platform::Custom(name),
        }
    }
}

impl From<String> for Platform {
    fn from(s: String) -> Self {
        Platform::from(s.as_str())
    }
}

impl From<Platform> for String {
    fn from(p: Platform) -> Self {
        p.as_str().to_string()
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Platform::from(s))
    }
}
