//! Automation flag and the auto-send outbox pipeline.

use tracing::{debug, info};

use leaddesk_models::LeadId;

use crate::controller::{Dashboard, Outcome};
use crate::error::Result;

impl Dashboard {
    /// Flips auto-send on the backend and adopts whatever it reports.
    pub async fn toggle_automation(&mut self) -> Result<Outcome> {
        self.banner.clear();
        match self.client.toggle_automation().await {
            Ok(enabled) => {
                info!(enabled, "automation toggled");
                self.state.set_automation(enabled);
                self.banner
                    .ok(if enabled { "Auto-send ON." } else { "Auto-send OFF." });
                Ok(Outcome::Done)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Queues the active lead's latest assistant reply.
    pub async fn enqueue_last_reply(&mut self) -> Result<Outcome> {
        self.banner.clear();
        let lead_id = match self.require_active() {
            Ok(id) => id,
            Err(e) => return Err(self.fail(e)),
        };
        match self.client.enqueue_last_reply(&lead_id).await {
            Ok(outbox_id) => {
                info!(lead_id = %lead_id, outbox_id = %outbox_id, "reply queued");
                self.banner.ok(format!("Queued last reply ({}).", outbox_id));
                Ok(Outcome::Done)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Processes everything queued. An empty run is a success.
    pub async fn run_outbox(&mut self) -> Result<Outcome> {
        self.banner.clear();
        match self.client.run_outbox().await {
            Ok(report) => {
                info!(sent = report.sent, failed = report.failed, "outbox run");
                self.banner.ok(format!(
                    "Outbox run complete. Sent={} Failed={}",
                    report.sent, report.failed
                ));
                Ok(Outcome::Done)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Enqueue then run, as the continuation of a successful send.
    ///
    /// The run is only attempted once the enqueue has succeeded. Only the
    /// combined outcome reaches the banner.
    pub(crate) async fn auto_send(&mut self, lead_id: &LeadId) {
        let outbox_id = match self.client.enqueue_last_reply(lead_id).await {
            Ok(id) => id,
            Err(e) => {
                self.banner
                    .error(format!("Reply generated, but auto-send failed: {}", e));
                return;
            }
        };
        debug!(lead_id = %lead_id, outbox_id = %outbox_id, "auto-send queued");

        match self.client.run_outbox().await {
            Ok(report) => {
                info!(lead_id = %lead_id, sent = report.sent, failed = report.failed, "auto-send run");
                self.banner.ok(format!(
                    "Reply generated + auto-sent (simulated). Sent={}",
                    report.sent
                ));
            }
            Err(e) => self.banner.error(format!(
                "Reply generated and queued, but outbox run failed: {}",
                e
            )),
        }
    }
}
