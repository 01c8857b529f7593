//! Conversation messages.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::null_as_empty;

/// Author of a message in a lead's thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The operator (or the lead, relayed by the operator).
    User,
    /// A generated reply.
    Assistant,
    /// Anything the backend adds later.
    #[serde(other)]
    Other,
}

/// One entry of a conversation thread. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
}

impl Message {
    /// Creates a message with no timestamp.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: String::new(),
        }
    }

    /// Creates an operator message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates a generated reply.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Sets the raw timestamp.
    pub fn at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self
    }

    /// Parses `created_at`.
    ///
    /// The backend writes naive UTC ISO-8601 (`2026-01-02T03:04:05.123456`);
    /// RFC 3339 with an offset is accepted as well.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let raw = self.created_at.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }
}
