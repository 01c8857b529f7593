//! Delivery integrations and the manual outbound queue.

use tracing::{info, warn};

use leaddesk_models::{parse_switch, IntegrationSettings, Integrations, OutboundMessage};

use crate::controller::{Dashboard, Outcome};
use crate::error::{DeskError, Result};

/// Channel used when a queued message names none.
pub const DEFAULT_CHANNEL: &str = "sms";

/// Integration settings to change. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrationsUpdate {
    pub twilio: Option<bool>,
    pub sendgrid: Option<bool>,
    pub autosend: Option<bool>,
    pub channels: Option<String>,
}

impl IntegrationsUpdate {
    pub fn is_empty(&self) -> bool {
        self.twilio.is_none()
            && self.sendgrid.is_none()
            && self.autosend.is_none()
            && self.channels.is_none()
    }

    /// Records `key=value` from operator input. Returns `false` for an
    /// unknown key or a value that is not on/off.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let slot = match key.trim().to_lowercase().as_str() {
            "twilio" | "sms" => &mut self.twilio,
            "sendgrid" | "email" => &mut self.sendgrid,
            "autosend" | "auto" => &mut self.autosend,
            "channels" => {
                let value = value.trim();
                if value.is_empty() {
                    return false;
                }
                self.channels = Some(value.to_string());
                return true;
            }
            _ => return false,
        };
        match parse_switch(value) {
            Some(on) => {
                *slot = Some(on);
                true
            }
            None => false,
        }
    }

    fn apply_to(&self, integrations: &mut Integrations) {
        if let Some(on) = self.twilio {
            integrations.twilio_enabled = on;
        }
        if let Some(on) = self.sendgrid {
            integrations.sendgrid_enabled = on;
        }
        if let Some(on) = self.autosend {
            integrations.autosend_enabled = on;
        }
        if let Some(channels) = &self.channels {
            integrations.autosend_channels = channels.clone();
        }
    }
}

/// A message typed by the operator for the outbound queue.
///
/// Blank `channel` means [`DEFAULT_CHANNEL`]; blank `recipient` means the
/// active lead's contact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundDraft {
    pub channel: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl OutboundDraft {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }
}

impl Dashboard {
    /// Reloads the integration switches.
    pub async fn refresh_integrations(&mut self) -> Result<Outcome> {
        self.banner.clear();
        match self.client.integrations().await {
            Ok(settings) => {
                self.state.apply_integrations(Some(settings));
                Ok(Outcome::Done)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Changes some integration switches and keeps the rest as the
    /// backend has them.
    pub async fn update_integrations(&mut self, update: IntegrationsUpdate) -> Result<Outcome> {
        self.banner.clear();
        if update.is_empty() {
            return Err(self.fail(DeskError::validation("Nothing to update.")));
        }

        let mut draft = self.state.clone();
        let result = async {
            let mut settings = self.client.integrations().await?;
            update.apply_to(&mut settings.integrations);
            self.client.save_integrations(&settings.integrations).await?;
            info!(
                twilio = settings.integrations.twilio_enabled,
                sendgrid = settings.integrations.sendgrid_enabled,
                autosend = settings.integrations.autosend_enabled,
                "integrations saved"
            );
            draft.apply_integrations(Some(settings));
            Ok::<_, DeskError>("Integrations saved.".to_string())
        }
        .await;
        self.settle(draft, result)
    }

    /// Queues a free-form message, attached to the active lead when there
    /// is one.
    pub async fn queue_outbound(&mut self, draft: OutboundDraft) -> Result<Outcome> {
        self.banner.clear();
        let body = draft.body.trim();
        if body.is_empty() {
            return Err(self.fail(DeskError::validation("Type a message first.")));
        }

        let active = self.state.active_lead();
        let recipient = match draft.recipient.trim() {
            "" => active.map(|l| l.contact.trim().to_string()).unwrap_or_default(),
            given => given.to_string(),
        };
        if recipient.is_empty() {
            return Err(self.fail(DeskError::validation("Enter a recipient.")));
        }
        let channel = match draft.channel.trim().to_lowercase() {
            c if c.is_empty() => DEFAULT_CHANNEL.to_string(),
            c => c,
        };

        let message = OutboundMessage {
            lead_id: active.map(|l| l.id.clone()),
            channel,
            recipient,
            subject: draft.subject.trim().to_string(),
            body: body.to_string(),
        };
        match self.client.queue_outbound(&message).await {
            Ok(queued) => {
                info!(channel = %message.channel, outbox_id = %queued.id, "outbound queued");
                self.banner
                    .ok(format!("Queued {} message ({}).", message.channel, queued.id));
                Ok(Outcome::Done)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Delivers everything in the outbound queue.
    pub async fn run_outbound(&mut self) -> Result<Outcome> {
        self.banner.clear();
        match self.client.run_outbound().await {
            Ok(report) => {
                info!(sent = report.sent, failed = report.failed, "outbound run");
                self.banner.ok(format!(
                    "Outbound run complete. Sent={} Failed={}",
                    report.sent, report.failed
                ));
                Ok(Outcome::Done)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Boot-time load. Failures read as unknown settings.
    pub(crate) async fn fetch_integrations(&self) -> Option<IntegrationSettings> {
        match self.client.integrations().await {
            Ok(settings) => Some(settings),
            Err(e) => {
                warn!(error = %e, "integrations unavailable");
                None
            }
        }
    }
}
