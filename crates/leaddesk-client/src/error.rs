//! Error types for the remote client.

use serde_json::Value;
use thiserror::Error;

/// Errors produced by [`crate::RemoteClient`].
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The backend answered with a non-success status.
    ///
    /// Displays as the bare message so it can go straight to the banner.
    #[error("{message}")]
    Request {
        /// `error` or `detail` from the payload, else a generic status line.
        message: String,
        /// HTTP status code.
        status: u16,
        /// Parsed response body, if it was JSON.
        payload: Option<Value>,
    },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Transport(String),

    /// A successful response did not have the expected shape.
    #[error("unexpected response from {path}: {message}")]
    Decode {
        /// Request path.
        path: String,
        /// What was wrong.
        message: String,
    },

    /// The configured base URL cannot be used.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// HTTP status for backend rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Builds the request error for a failed response, extracting the
    /// human-readable message from the payload when there is one.
    pub fn from_status(status: u16, payload: Option<Value>) -> Self {
        let message = payload
            .as_ref()
            .and_then(|p| text_field(p, "error").or_else(|| text_field(p, "detail")))
            .unwrap_or_else(|| format!("Request failed ({})", status));

        ClientError::Request {
            message,
            status,
            payload,
        }
    }
}

fn text_field(payload: &Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
