//! Operator intents and the table that maps them to operations.

use tracing::debug;

use leaddesk_models::{LeadId, NewLead, Profile};

use crate::controller::{Dashboard, Outcome};
use crate::error::Result;
use crate::integrations::{IntegrationsUpdate, OutboundDraft};
use crate::leads::LimitsUpdate;

/// Everything the operator can ask the dashboard to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Boot,
    SelectLead(LeadId),
    SelectNext,
    SelectPrevious,
    SendMessage(String),
    MoveStage(String),
    AddLead(NewLead),
    DeleteActiveLead,
    /// `None` targets the `Lost` stage.
    BulkDelete(Option<String>),
    SaveProfile(Profile),
    ToggleAutomation,
    EnqueueLastReply,
    RunOutbox,
    RefreshUsage,
    UpdateLimits(LimitsUpdate),
    RefreshIntegrations,
    UpdateIntegrations(IntegrationsUpdate),
    QueueOutbound(OutboundDraft),
    RunOutbound,
}

impl Intent {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Boot => "boot",
            Intent::SelectLead(_) => "select_lead",
            Intent::SelectNext => "select_next",
            Intent::SelectPrevious => "select_previous",
            Intent::SendMessage(_) => "send_message",
            Intent::MoveStage(_) => "move_stage",
            Intent::AddLead(_) => "add_lead",
            Intent::DeleteActiveLead => "delete_active_lead",
            Intent::BulkDelete(_) => "bulk_delete",
            Intent::SaveProfile(_) => "save_profile",
            Intent::ToggleAutomation => "toggle_automation",
            Intent::EnqueueLastReply => "enqueue_last_reply",
            Intent::RunOutbox => "run_outbox",
            Intent::RefreshUsage => "refresh_usage",
            Intent::UpdateLimits(_) => "update_limits",
            Intent::RefreshIntegrations => "refresh_integrations",
            Intent::UpdateIntegrations(_) => "update_integrations",
            Intent::QueueOutbound(_) => "queue_outbound",
            Intent::RunOutbound => "run_outbound",
        }
    }
}

impl Dashboard {
    /// Runs the operation behind `intent`.
    pub async fn dispatch(&mut self, intent: Intent) -> Result<Outcome> {
        debug!(intent = intent.name(), "dispatch");
        match intent {
            Intent::Boot => self.load_all().await,
            Intent::SelectLead(id) => self.select_lead(&id).await,
            Intent::SelectNext => self.select_relative(1).await,
            Intent::SelectPrevious => self.select_relative(-1).await,
            Intent::SendMessage(text) => self.send_message(&text).await,
            Intent::MoveStage(stage) => self.move_stage(&stage).await,
            Intent::AddLead(lead) => self.add_lead(lead).await,
            Intent::DeleteActiveLead => self.delete_active_lead().await,
            Intent::BulkDelete(stage) => self.bulk_delete(stage.as_deref()).await,
            Intent::SaveProfile(profile) => self.save_profile(profile).await,
            Intent::ToggleAutomation => self.toggle_automation().await,
            Intent::EnqueueLastReply => self.enqueue_last_reply().await,
            Intent::RunOutbox => self.run_outbox().await,
            Intent::RefreshUsage => self.refresh_usage().await,
            Intent::UpdateLimits(update) => self.update_limits(update).await,
            Intent::RefreshIntegrations => self.refresh_integrations().await,
            Intent::UpdateIntegrations(update) => self.update_integrations(update).await,
            Intent::QueueOutbound(draft) => self.queue_outbound(draft).await,
            Intent::RunOutbound => self.run_outbound().await,
        }
    }
}
