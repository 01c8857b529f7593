//! The dashboard controller: owns the view state and the banner.
//!
//! Operations stage their changes on a copy of the view state and commit it
//! only once every required call has succeeded, so a failure anywhere
//! leaves the state exactly as it was. Lead operations live in
//! [`crate::leads`], automation and outbox operations in [`crate::outbox`].

use std::sync::Arc;

use tracing::{debug, warn};

use leaddesk_client::RemoteClient;
use leaddesk_models::{LeadId, Usage};

use crate::banner::Banner;
use crate::confirm::{Confirm, Decline};
use crate::error::{DeskError, Result};
use crate::store::ViewState;

/// What a successful operation asks of the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing beyond re-rendering.
    Done,
    /// A chat message went out; the composer should be cleared.
    Sent,
    /// The operator declined a confirmation. Nothing changed.
    Cancelled,
}

/// Single writer of the [`ViewState`].
pub struct Dashboard {
    pub(crate) client: RemoteClient,
    pub(crate) state: ViewState,
    pub(crate) banner: Banner,
    pub(crate) confirm: Arc<dyn Confirm>,
}

impl Dashboard {
    /// Creates a controller with empty state. Destructive actions are
    /// declined until a [`Confirm`] is installed.
    pub fn new(client: RemoteClient) -> Self {
        Self {
            client,
            state: ViewState::new(),
            banner: Banner::default(),
            confirm: Arc::new(Decline),
        }
    }

    /// Installs the confirmation gate.
    pub fn with_confirm(mut self, confirm: Arc<dyn Confirm>) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn client(&self) -> &RemoteClient {
        &self.client
    }

    /// Loads everything at startup: profile, usage, leads with the active
    /// conversation, the automation flag, then the integration switches.
    ///
    /// Each piece that loads is kept. Usage, automation and integration
    /// failures fall back to absent or off; a profile or lead failure is shown on the
    /// banner without stopping the rest.
    pub async fn load_all(&mut self) -> Result<Outcome> {
        self.banner.clear();
        let mut draft = self.state.clone();
        let mut failure: Option<DeskError> = None;

        match self.client.profile().await {
            Ok(profile) => draft.apply_profile(profile),
            Err(e) => {
                warn!(error = %e, "profile load failed");
                failure.get_or_insert(e.into());
            }
        }

        draft.apply_usage(self.fetch_usage().await);

        match self.client.list_leads().await {
            Ok(leads) => {
                debug!(count = leads.len(), "leads fetched");
                draft.reconcile_leads(leads);
                // a missing conversation still leaves the list usable
                if let Err(e) = self.reload_thread(&mut draft).await {
                    warn!(error = %e, "conversation load failed");
                    draft.clear_thread();
                    failure.get_or_insert(e);
                }
            }
            Err(e) => {
                warn!(error = %e, "lead load failed");
                failure.get_or_insert(e.into());
            }
        }

        let enabled = match self.client.automation_state().await {
            Ok(enabled) => enabled,
            Err(e) => {
                warn!(error = %e, "automation state unavailable, assuming off");
                false
            }
        };
        draft.set_automation(enabled);
        draft.apply_integrations(self.fetch_integrations().await);

        self.state = draft;
        if let Some(e) = failure {
            self.banner.error(e.to_string());
        }
        debug!(leads = self.state.leads().len(), "dashboard loaded");
        Ok(Outcome::Done)
    }

    /// Fetches the lead list into `draft`, re-derives the selection and
    /// loads the selected lead's conversation.
    pub(crate) async fn reload_leads(&self, draft: &mut ViewState) -> Result<()> {
        let leads = self.client.list_leads().await?;
        debug!(count = leads.len(), "leads fetched");
        draft.reconcile_leads(leads);
        self.reload_thread(draft).await
    }

    /// Loads the conversation of the lead selected in `draft`.
    async fn reload_thread(&self, draft: &mut ViewState) -> Result<()> {
        match draft.active_lead_id().cloned() {
            Some(id) => {
                let messages = self.client.conversation(&id).await?;
                debug!(lead_id = %id, count = messages.len(), "conversation fetched");
                draft.apply_thread(id, messages);
            }
            None => draft.clear_thread(),
        }
        Ok(())
    }

    /// Background usage refresh. Failures read as absent usage.
    pub(crate) async fn fetch_usage(&self) -> Option<Usage> {
        match self.client.usage().await {
            Ok(usage) => Some(usage),
            Err(e) => {
                warn!(error = %e, "usage refresh failed");
                None
            }
        }
    }

    pub(crate) fn require_active(&self) -> Result<LeadId> {
        self.state
            .active_lead_id()
            .cloned()
            .ok_or_else(|| DeskError::validation("Select a lead first."))
    }

    /// Commits `draft` and shows `message`, or shows the error and keeps
    /// the old state.
    pub(crate) fn settle(&mut self, draft: ViewState, result: Result<String>) -> Result<Outcome> {
        match result {
            Ok(message) => {
                self.state = draft;
                self.banner.ok(message);
                Ok(Outcome::Done)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Shows `err` on the banner and hands it back.
    pub(crate) fn fail(&mut self, err: DeskError) -> DeskError {
        match &err {
            DeskError::Validation(_) => debug!(error = %err, "rejected"),
            _ => warn!(error = %err, "operation failed"),
        }
        self.banner.error(err.to_string());
        err
    }
}
