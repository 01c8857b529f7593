//! Delivery integrations and manually queued outbound messages.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ids::{LeadId, OutboxId};
use crate::null_as_empty;

/// Channels auto-send uses when nothing is configured.
pub const DEFAULT_AUTOSEND_CHANNELS: &str = "sms,email";

/// Provider switches. The backend stores the flags as `0`/`1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integrations {
    #[serde(default, deserialize_with = "flag", serialize_with = "as_int")]
    pub twilio_enabled: bool,
    #[serde(default, deserialize_with = "flag", serialize_with = "as_int")]
    pub sendgrid_enabled: bool,
    #[serde(default, deserialize_with = "flag", serialize_with = "as_int")]
    pub autosend_enabled: bool,
    #[serde(default = "default_channels", deserialize_with = "channels")]
    pub autosend_channels: String,
}

impl Default for Integrations {
    fn default() -> Self {
        Self {
            twilio_enabled: false,
            sendgrid_enabled: false,
            autosend_enabled: false,
            autosend_channels: default_channels(),
        }
    }
}

/// Reads `on`/`off` style input: `1`, `on`, `true`, `yes` and their opposites.
pub fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "on" | "true" | "yes" => Some(true),
        "0" | "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Whether the backend has credentials for each provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvReady {
    #[serde(default)]
    pub twilio: bool,
    #[serde(default)]
    pub sendgrid: bool,
}

/// Integration switches together with provider readiness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationSettings {
    #[serde(default)]
    pub integrations: Integrations,
    #[serde(default)]
    pub env_ready: EnvReady,
}

/// A message for the outbound queue, outside the reply pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<LeadId>,
    pub channel: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// The queue entry the backend created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueuedOutbound {
    pub id: OutboxId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
}

fn default_channels() -> String {
    DEFAULT_AUTOSEND_CHANNELS.to_string()
}

fn channels<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = null_as_empty(deserializer)?;
    Ok(if raw.trim().is_empty() {
        default_channels()
    } else {
        raw.trim().to_string()
    })
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => false,
        Some(Raw::Bool(b)) => b,
        Some(Raw::Int(n)) => n != 0,
        Some(Raw::Text(s)) => parse_switch(&s).unwrap_or(false),
    })
}

fn as_int<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(u8::from(*value))
}
