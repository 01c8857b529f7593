//! Outbox run results.

use serde::{Deserialize, Serialize};

/// Counts reported by one outbox run.
///
/// Absent counts are zero; an empty run is a valid outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxRunReport {
    #[serde(default)]
    pub sent: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queued_found: Option<u32>,
}
