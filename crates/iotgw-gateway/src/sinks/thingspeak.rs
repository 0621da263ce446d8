//! ThingSpeak channel update

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use iotgw_core::{fields, PlatformSink, SensorReading, SinkError};

use super::{confirmation, SendRequest, SendTransport, Transmitter};

/// ThingSpeak update endpoint
pub const THINGSPEAK_UPDATE_URL: &str = "https://api.thingspeak.com/update";

/// Channel field slots available on a ThingSpeak channel
pub const MAX_CHANNEL_FIELDS: u8 = 8;

/// Default reading field to channel field assignment
pub fn default_field_map() -> BTreeMap<String, u8> {
    [
        (fields::TEMPERATURE, 1),
        (fields::HUMIDITY, 2),
        (fields::PRESSURE, 3),
        (fields::SPEED, 4),
        (fields::RPM, 5),
        (fields::FUEL, 6),
    ]
    .into_iter()
    .map(|(field, slot)| (field.to_string(), slot))
    .collect()
}

/// Publishes to a ThingSpeak channel.
///
/// `target` is the channel id and is only echoed in the confirmation; the
/// write API key selects the channel. Each reading field goes to a fixed
/// `fieldN` slot from the field map, so a sensor keeps its slot whatever
/// else the reading carries. Latitude and longitude use ThingSpeak's own
/// location parameters.
pub struct ThingSpeakSink {
    transmitter: Arc<dyn Transmitter>,
    field_map: BTreeMap<String, u8>,
}

impl ThingSpeakSink {
    pub fn new(transmitter: Arc<dyn Transmitter>) -> Self {
        Self {
            transmitter,
            field_map: default_field_map(),
        }
    }

    /// Replace the field assignment for a channel laid out differently.
    /// Slots outside `1..=8` are ignored.
    pub fn with_field_map(mut self, field_map: BTreeMap<String, u8>) -> Self {
        self.field_map = field_map
            .into_iter()
            .filter(|(_, slot)| (1..=MAX_CHANNEL_FIELDS).contains(slot))
            .collect();
        self
    }

    fn prepare(
        &self,
        credential: Option<&str>,
        payload: &SensorReading,
    ) -> Result<SendRequest, SinkError> {
        let api_key = credential
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SinkError::MissingCredential("ThingSpeak write API key".to_string()))?;

        let mut body = serde_json::Map::new();
        body.insert("api_key".to_string(), serde_json::json!(api_key));
        for (field, value) in payload.iter() {
            let key = match (self.field_map.get(field), field) {
                (Some(slot), _) => format!("field{}", slot),
                (None, fields::LATITUDE | fields::LONGITUDE) => field.to_string(),
                (None, _) => {
                    return Err(SinkError::UnmappedField(format!(
                        "'{}' has no ThingSpeak channel field",
                        field
                    )))
                }
            };
            body.insert(key, serde_json::json!(value));
        }
        if let Some(ts) = payload.timestamp() {
            body.insert("created_at".to_string(), serde_json::json!(ts.to_rfc3339()));
        }

        Ok(SendRequest {
            platform: "thingspeak".to_string(),
            transport: SendTransport::Http {
                method: "POST".to_string(),
                url: THINGSPEAK_UPDATE_URL.to_string(),
                headers: Vec::new(),
            },
            body: serde_json::Value::Object(body),
        })
    }
}

#[async_trait]
impl PlatformSink for ThingSpeakSink {
    fn name(&self) -> &str {
        "thingspeak"
    }

    async fn send(
        &self,
        target: &str,
        credential: Option<&str>,
        payload: &SensorReading,
    ) -> Result<String, SinkError> {
        let request = self.prepare(credential, payload)?;
        self.transmitter.transmit(&request).await?;
        Ok(confirmation(self.name(), target, payload))
    }
}
