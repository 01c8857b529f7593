//! Core data models for LeadDesk.
//!
//! Everything here mirrors the shape the backend returns. Nothing is
//! persisted locally; the client rebuilds these values on every load.

pub mod ids;
pub mod integrations;
pub mod lead;
pub mod message;
pub mod outbox;
pub mod profile;
pub mod usage;

pub use ids::{LeadId, OutboxId};
pub use integrations::{
    parse_switch, EnvReady, IntegrationSettings, Integrations, OutboundMessage, QueuedOutbound,
    DEFAULT_AUTOSEND_CHANNELS,
};
pub use lead::{Lead, NewLead, DEFAULT_STAGES, LOST_STAGE, NEW_STAGE};
pub use message::{Message, Role};
pub use outbox::OutboxRunReport;
pub use profile::{ContactMethod, Profile, Tone};
pub use usage::{Limits, Usage};

use serde::{Deserialize, Deserializer};

/// Deserialize a nullable string column as an empty string.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
