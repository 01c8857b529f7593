//! Error types for the controller.

use leaddesk_client::ClientError;
use thiserror::Error;

/// Errors returned by controller operations.
///
/// An `Err` always means the view state was left exactly as it was.
#[derive(Debug, Clone, Error)]
pub enum DeskError {
    /// Local precondition failed before any request was made.
    #[error("{0}")]
    Validation(String),

    /// A backend call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The worker is gone.
    #[error("controller stopped")]
    Stopped,
}

impl DeskError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        DeskError::Validation(msg.into())
    }
}

/// Result type for controller operations.
pub type Result<T> = std::result::Result<T, DeskError>;
