//! Gate for destructive actions.

use async_trait::async_trait;

/// Asks the operator to approve a destructive action.
#[async_trait]
pub trait Confirm: Send + Sync {
    /// Returns `true` to go ahead.
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Approves everything. Backs the CLI's `--yes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

#[async_trait]
impl Confirm for AssumeYes {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Declines everything. Used when no operator can be asked.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decline;

#[async_trait]
impl Confirm for Decline {
    async fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}
