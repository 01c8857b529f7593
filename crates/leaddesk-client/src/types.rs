//! Response envelopes.
//!
//! Each envelope names only the fields the client reads and defaults the
//! rest, so extra or missing keys never fail a call on their own.

use serde::Deserialize;

use leaddesk_models::{Lead, LeadId, Limits, Message, OutboxId, Profile, QueuedOutbound, Usage};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LeadsEnvelope {
    #[serde(default)]
    pub leads: Vec<Lead>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ConvoEnvelope {
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProfileEnvelope {
    #[serde(default)]
    pub profile: Option<Profile>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CreatedLeadEnvelope {
    #[serde(default)]
    pub lead: Option<CreatedLead>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedLead {
    pub id: LeadId,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BulkDeleteEnvelope {
    #[serde(default)]
    pub deleted: u32,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AutomationEnvelope {
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EnqueueEnvelope {
    #[serde(default)]
    pub outbox_id: Option<OutboxId>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QueuedEnvelope {
    #[serde(default)]
    pub queued: Option<QueuedOutbound>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LimitsEnvelope {
    #[serde(default)]
    pub limits: Limits,
}

/// Result of a chat send: the generated reply and the usage after it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// Backend health check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub dialect: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
}
