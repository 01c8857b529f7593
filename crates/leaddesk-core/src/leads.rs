//! Lead and conversation operations.

use tracing::info;

use leaddesk_models::{LeadId, Limits, NewLead, Profile, LOST_STAGE};

use crate::controller::{Dashboard, Outcome};
use crate::error::{DeskError, Result};
use crate::store::ViewState;

/// Fields to change in the backend's plan limits. `None` keeps the
/// current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LimitsUpdate {
    pub lead_cap: Option<u32>,
    pub plan: Option<String>,
    pub monthly_price_usd: Option<u32>,
}

impl LimitsUpdate {
    pub fn is_empty(&self) -> bool {
        self.lead_cap.is_none() && self.plan.is_none() && self.monthly_price_usd.is_none()
    }

    fn apply_to(&self, mut limits: Limits) -> Limits {
        if let Some(cap) = self.lead_cap {
            limits.lead_cap = cap;
        }
        if let Some(plan) = self.plan.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            limits.plan = plan.to_string();
        }
        if let Some(price) = self.monthly_price_usd {
            limits.monthly_price_usd = price;
        }
        limits
    }
}

impl Dashboard {
    /// Makes `id` the active lead and shows its conversation.
    ///
    /// The conversation is fetched first; selection and thread change
    /// together once it arrives. Usage is left alone.
    pub async fn select_lead(&mut self, id: &LeadId) -> Result<Outcome> {
        self.banner.clear();
        if self.state.lead(id).is_none() {
            return Err(self.fail(DeskError::validation(format!("Unknown lead {}.", id))));
        }

        let messages = match self.client.conversation(id).await {
            Ok(messages) => messages,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.state.set_active(id.clone());
        self.state.apply_thread(id.clone(), messages);
        Ok(Outcome::Done)
    }

    /// Selects the lead `offset` rows away from the active one, clamped to
    /// the list. Without a selection the first lead is taken.
    pub async fn select_relative(&mut self, offset: isize) -> Result<Outcome> {
        let leads = self.state.leads();
        if leads.is_empty() {
            self.banner.clear();
            return Ok(Outcome::Done);
        }
        let target = match self.state.active_index() {
            Some(current) => (current as isize + offset).clamp(0, leads.len() as isize - 1) as usize,
            None => 0,
        };
        let id = leads[target].id.clone();
        self.select_lead(&id).await
    }

    /// Sends `text` to the active lead and resyncs usage, leads and the
    /// conversation. With auto-send on, the outbox pipeline follows.
    pub async fn send_message(&mut self, text: &str) -> Result<Outcome> {
        self.banner.clear();
        let lead_id = match self.require_active() {
            Ok(id) => id,
            Err(e) => return Err(self.fail(e)),
        };
        let text = text.trim();
        if text.is_empty() {
            return Err(self.fail(DeskError::validation("Type a message first.")));
        }

        self.state.set_sending(true);
        let mut draft = self.state.clone();
        let result = self.exchange(&mut draft, &lead_id, text).await;
        self.state.set_sending(false);
        draft.set_sending(false);

        if let Err(e) = result {
            return Err(self.fail(e));
        }
        self.state = draft;
        info!(lead_id = %lead_id, "reply generated");

        if self.state.auto_send_enabled() {
            self.auto_send(&lead_id).await;
        } else {
            self.banner.ok("Reply generated.");
        }
        Ok(Outcome::Sent)
    }

    async fn exchange(
        &self,
        draft: &mut ViewState,
        lead_id: &LeadId,
        text: &str,
    ) -> Result<()> {
        let reply = self.client.send_chat(lead_id, text).await?;
        let usage = match reply.usage {
            Some(usage) => Some(usage),
            None => self.fetch_usage().await,
        };
        draft.apply_usage(usage);
        self.reload_leads(draft).await
    }

    /// Moves the active lead to `stage`. The new stage is only seen
    /// through the reloaded list.
    pub async fn move_stage(&mut self, stage: &str) -> Result<Outcome> {
        self.banner.clear();
        let lead_id = match self.require_active() {
            Ok(id) => id,
            Err(e) => return Err(self.fail(e)),
        };
        let stage = stage.trim();
        if stage.is_empty() {
            return Err(self.fail(DeskError::validation("Pick a stage first.")));
        }
        let label = self.state.active_lead().map(|l| l.label().to_string()).unwrap_or_default();

        let mut draft = self.state.clone();
        let result = async {
            self.client.move_stage(&lead_id, stage).await?;
            self.reload_leads(&mut draft).await?;
            Ok::<_, DeskError>(format!("Moved \"{}\" to {}.", label, stage))
        }
        .await;
        info!(lead_id = %lead_id, stage, ok = result.is_ok(), "stage move");
        self.settle(draft, result)
    }

    /// Creates a lead and selects it.
    pub async fn add_lead(&mut self, lead: NewLead) -> Result<Outcome> {
        self.banner.clear();
        if !lead.is_identifiable() {
            return Err(self.fail(DeskError::validation("Enter a name or contact.")));
        }

        let mut draft = self.state.clone();
        let result = async {
            let id = self.client.create_lead(&lead).await?;
            info!(lead_id = %id, "lead created");
            draft.set_active(id);
            self.reload_leads(&mut draft).await?;
            draft.apply_usage(self.fetch_usage().await);
            Ok::<_, DeskError>("Lead added.".to_string())
        }
        .await;
        self.settle(draft, result)
    }

    /// Deletes the active lead after confirmation.
    pub async fn delete_active_lead(&mut self) -> Result<Outcome> {
        self.banner.clear();
        let lead_id = match self.require_active() {
            Ok(id) => id,
            Err(e) => return Err(self.fail(e)),
        };
        let label = self
            .state
            .active_lead()
            .map(|l| l.label().to_string())
            .unwrap_or_else(|| lead_id.to_string());

        if !self.confirm.confirm(&format!("Delete lead \"{}\"?", label)).await {
            return Ok(Outcome::Cancelled);
        }

        let mut draft = self.state.clone();
        let result = async {
            self.client.delete_lead(&lead_id).await?;
            info!(lead_id = %lead_id, "lead deleted");
            draft.clear_active();
            self.reload_leads(&mut draft).await?;
            draft.apply_usage(self.fetch_usage().await);
            Ok::<_, DeskError>("Lead deleted.".to_string())
        }
        .await;
        self.settle(draft, result)
    }

    /// Deletes every lead in `stage` (default `Lost`) after confirmation.
    pub async fn bulk_delete(&mut self, stage: Option<&str>) -> Result<Outcome> {
        self.banner.clear();
        let stage = stage
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(LOST_STAGE)
            .to_string();

        if !self
            .confirm
            .confirm(&format!("Delete ALL leads in \"{}\"?", stage))
            .await
        {
            return Ok(Outcome::Cancelled);
        }

        let mut draft = self.state.clone();
        let result = async {
            let deleted = self.client.bulk_delete(&stage).await?;
            info!(stage = %stage, deleted, "bulk delete");
            draft.clear_active();
            self.reload_leads(&mut draft).await?;
            draft.apply_usage(self.fetch_usage().await);
            Ok::<_, DeskError>(format!("Deleted {} leads in \"{}\".", deleted, stage))
        }
        .await;
        self.settle(draft, result)
    }

    /// Saves the business profile.
    pub async fn save_profile(&mut self, profile: Profile) -> Result<Outcome> {
        self.banner.clear();
        let profile = profile.normalized();

        let mut draft = self.state.clone();
        let result = async {
            self.client.save_profile(&profile).await?;
            info!("profile saved");
            draft.apply_profile(profile);
            Ok::<_, DeskError>("Profile saved.".to_string())
        }
        .await;
        self.settle(draft, result)
    }

    /// Fetches usage on request. Unlike the background refresh, a failure
    /// is reported.
    pub async fn refresh_usage(&mut self) -> Result<Outcome> {
        self.banner.clear();
        match self.client.usage().await {
            Ok(usage) => {
                self.state.apply_usage(Some(usage));
                Ok(Outcome::Done)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Changes plan limits, then refreshes usage since the cap moved.
    pub async fn update_limits(&mut self, update: LimitsUpdate) -> Result<Outcome> {
        self.banner.clear();
        if update.is_empty() {
            return Err(self.fail(DeskError::validation("Nothing to update.")));
        }

        let mut draft = self.state.clone();
        let result = async {
            let limits = update.apply_to(self.client.limits().await?);
            self.client.save_limits(&limits).await?;
            info!(plan = %limits.plan, lead_cap = limits.lead_cap, "limits saved");
            draft.apply_usage(self.fetch_usage().await);
            Ok::<_, DeskError>(format!("Limits saved: {} plan, cap {}.", limits.plan, limits.lead_cap))
        }
        .await;
        self.settle(draft, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::BannerKind;
    use crate::confirm::Decline;
    use crate::testing::FakeBackend;
    use serde_json::json;
    use std::sync::Arc;

    async fn booted(backend: &Arc<FakeBackend>) -> Dashboard {
        let mut desk = backend.dashboard();
        desk.load_all().await.unwrap();
        backend.clear_calls();
        desk
    }

    #[tokio::test]
    async fn test_add_lead_to_empty_list_selects_it() {
        let backend = FakeBackend::new();
        let mut desk = booted(&backend).await;
        assert!(desk.state().leads().is_empty());

        desk.add_lead(NewLead::new("Jo", "@jo", "ig")).await.unwrap();

        assert_eq!(desk.state().active_lead_id(), Some(&LeadId::from("L1")));
        assert_eq!(desk.state().leads().len(), 1);
        assert_eq!(desk.state().leads()[0].name, "Jo");
        assert_eq!(desk.banner().text(), "Lead added.");
        assert_eq!(desk.state().usage().map(|u| u.used_leads), Some(1));
    }

    #[tokio::test]
    async fn test_count_changing_ops_refetch_usage_once() {
        let backend = FakeBackend::new().with_leads(&[
            ("L1", "Ann", "New"),
            ("L2", "Bo", "Lost"),
            ("L3", "Cy", "Lost"),
        ]);
        let mut desk = booted(&backend).await;

        desk.add_lead(NewLead::new("Di", "", "")).await.unwrap();
        assert_eq!(backend.count("GET /api/usage"), 1);

        backend.clear_calls();
        desk.delete_active_lead().await.unwrap();
        assert_eq!(backend.count("GET /api/usage"), 1);

        backend.clear_calls();
        desk.bulk_delete(None).await.unwrap();
        assert_eq!(backend.count("GET /api/usage"), 1);
    }

    #[tokio::test]
    async fn test_delete_active_falls_back_to_first_remaining() {
        let backend = FakeBackend::new().with_leads(&[("L1", "Ann", "New"), ("L2", "Bo", "New")]);
        let mut desk = booted(&backend).await;
        assert_eq!(desk.state().active_lead_id(), Some(&LeadId::from("L1")));

        desk.delete_active_lead().await.unwrap();

        assert_eq!(desk.state().active_lead_id(), Some(&LeadId::from("L2")));
        assert_eq!(desk.state().thread().lead_id(), Some(&LeadId::from("L2")));
        assert_eq!(desk.banner().text(), "Lead deleted.");
        let order = backend.calls();
        assert_eq!(order[0], "DELETE /api/leads/L1");
        assert_eq!(order[1], "GET /api/leads");
    }

    #[tokio::test]
    async fn test_bulk_delete_reports_count() {
        let backend = FakeBackend::new().with_leads(&[("L1", "Ann", "New")]);
        let mut desk = booted(&backend).await;
        backend.respond("POST /api/leads/bulk_delete", json!({"ok": true, "deleted": 4}));

        desk.bulk_delete(Some("Lost")).await.unwrap();

        assert_eq!(desk.banner().text(), "Deleted 4 leads in \"Lost\".");
        assert_eq!(desk.banner().kind(), BannerKind::Ok);
        assert_eq!(desk.state().active_lead_id(), Some(&LeadId::from("L1")));
    }

    #[tokio::test]
    async fn test_bulk_delete_empties_selection_with_list() {
        let backend = FakeBackend::new().with_leads(&[("L1", "Ann", "Lost"), ("L2", "Bo", "Lost")]);
        let mut desk = booted(&backend).await;

        desk.bulk_delete(Some(" ")).await.unwrap();

        assert!(desk.state().leads().is_empty());
        assert_eq!(desk.state().active_lead_id(), None);
        assert!(desk.state().thread().messages().is_empty());
        assert_eq!(desk.banner().text(), "Deleted 2 leads in \"Lost\".");
    }

    #[tokio::test]
    async fn test_declined_confirmation_changes_nothing() {
        let backend = FakeBackend::new().with_leads(&[("L1", "Ann", "Lost")]);
        let mut desk = booted(&backend).await.with_confirm(Arc::new(Decline));
        let before = desk.state().clone();

        assert_eq!(desk.delete_active_lead().await.unwrap(), Outcome::Cancelled);
        assert_eq!(desk.bulk_delete(None).await.unwrap(), Outcome::Cancelled);

        assert_eq!(desk.state(), &before);
        assert!(desk.banner().is_clear());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failures_leave_state_untouched() {
        let backend = FakeBackend::new()
            .with_leads(&[("L1", "Ann", "New"), ("L2", "Bo", "New")])
            .with_messages("L1", &["hello"]);
        let mut desk = booted(&backend).await;
        let before = desk.state().clone();

        backend.fail("DELETE /api/leads/L1", 500, json!({"detail": "db locked"}));
        let err = desk.delete_active_lead().await.unwrap_err();
        assert_eq!(err.to_string(), "db locked");
        assert_eq!(desk.state(), &before);
        assert_eq!(desk.banner().kind(), BannerKind::Error);
        assert_eq!(desk.banner().text(), "db locked");

        // the create succeeds but the reload does not
        backend.fail("GET /api/leads", 503, json!({}));
        desk.add_lead(NewLead::new("Cy", "", "")).await.unwrap_err();
        assert_eq!(desk.state(), &before);
        assert_eq!(desk.banner().text(), "Request failed (503)");

        backend.fail("POST /api/salesperson/chat", 402, json!({"error": "Monthly lead cap reached"}));
        desk.send_message("hi").await.unwrap_err();
        assert_eq!(desk.state(), &before);

        backend.fail("GET /api/convo/L2", 500, json!({"error": "boom"}));
        desk.select_lead(&LeadId::from("L2")).await.unwrap_err();
        assert_eq!(desk.state(), &before);
    }

    #[tokio::test]
    async fn test_validation_happens_before_any_request() {
        let backend = FakeBackend::new();
        let mut desk = booted(&backend).await;

        let err = desk.send_message("hi").await.unwrap_err();
        assert_eq!(err.to_string(), "Select a lead first.");
        let err = desk.add_lead(NewLead::new("  ", " ", "ig")).await.unwrap_err();
        assert_eq!(err.to_string(), "Enter a name or contact.");
        desk.move_stage("Won").await.unwrap_err();
        desk.delete_active_lead().await.unwrap_err();

        assert!(backend.calls().is_empty());
        assert_eq!(desk.banner().kind(), BannerKind::Error);
    }

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let backend = FakeBackend::new().with_leads(&[("L1", "Ann", "New")]);
        let mut desk = booted(&backend).await;

        let err = desk.send_message("   ").await.unwrap_err();
        assert_eq!(err.to_string(), "Type a message first.");
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_send_resyncs_thread_and_usage() {
        let backend = FakeBackend::new().with_leads(&[("L1", "Ann", "New")]);
        let mut desk = booted(&backend).await;

        let outcome = desk.send_message("  hi there ").await.unwrap();

        assert_eq!(outcome, Outcome::Sent);
        assert_eq!(desk.banner().text(), "Reply generated.");
        assert!(!desk.state().is_sending());
        let messages = desk.state().thread().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "hi there");
        assert_eq!(messages[1].content, "re: hi there");
        assert_eq!(
            backend.calls(),
            vec![
                "POST /api/salesperson/chat",
                "GET /api/usage",
                "GET /api/leads",
                "GET /api/convo/L1",
            ]
        );
    }

    #[tokio::test]
    async fn test_select_swaps_thread_without_usage() {
        let backend = FakeBackend::new()
            .with_leads(&[("L1", "Ann", "New"), ("L2", "Bo", "New")])
            .with_messages("L1", &["one"])
            .with_messages("L2", &["two", "three"]);
        let mut desk = booted(&backend).await;
        desk.banner.error("old");

        desk.select_lead(&LeadId::from("L2")).await.unwrap();

        assert_eq!(desk.state().active_lead_id(), Some(&LeadId::from("L2")));
        assert_eq!(desk.state().thread().messages().len(), 2);
        assert!(desk.banner().is_clear());
        assert_eq!(backend.calls(), vec!["GET /api/convo/L2"]);

        desk.select_relative(-5).await.unwrap();
        assert_eq!(desk.state().active_lead_id(), Some(&LeadId::from("L1")));
        assert_eq!(desk.state().thread().messages()[0].content, "one");
    }

    #[tokio::test]
    async fn test_select_next_without_selection_takes_first() {
        let backend = FakeBackend::new()
            .with_leads(&[("L1", "Ann", "New"), ("L2", "Bo", "New"), ("L3", "Cy", "New")]);
        let mut desk = booted(&backend).await;
        desk.state.clear_active();
        assert!(desk.state().active_index().is_none());

        desk.select_relative(1).await.unwrap();
        assert_eq!(desk.state().active_lead_id(), Some(&LeadId::from("L1")));

        desk.select_relative(1).await.unwrap();
        assert_eq!(desk.state().active_lead_id(), Some(&LeadId::from("L2")));
    }

    #[tokio::test]
    async fn test_select_unknown_lead_is_rejected() {
        let backend = FakeBackend::new().with_leads(&[("L1", "Ann", "New")]);
        let mut desk = booted(&backend).await;

        desk.select_lead(&LeadId::from("L9")).await.unwrap_err();
        assert_eq!(desk.state().active_lead_id(), Some(&LeadId::from("L1")));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_move_stage_reads_back_from_list() {
        let backend = FakeBackend::new().with_leads(&[("L1", "Ann", "New")]);
        let mut desk = booted(&backend).await;

        desk.move_stage("Won").await.unwrap();

        assert_eq!(desk.state().leads()[0].stage, "Won");
        assert_eq!(desk.banner().text(), "Moved \"Ann\" to Won.");
        assert_eq!(backend.count("GET /api/usage"), 0);
    }

    #[tokio::test]
    async fn test_save_profile_normalizes() {
        let backend = FakeBackend::new();
        let mut desk = booted(&backend).await;
        let mut profile = Profile::default();
        profile.set_field("biz_name", "  Acme   Roofing ");
        profile.set_field("tone", "");

        desk.save_profile(profile).await.unwrap();

        let saved = desk.state().profile().unwrap();
        assert_eq!(saved.biz_name, "Acme Roofing");
        assert_eq!(saved.tone.as_str(), "confident");
        assert_eq!(desk.banner().text(), "Profile saved.");
    }

    #[tokio::test]
    async fn test_update_limits_keeps_unset_fields() {
        let backend = FakeBackend::new();
        let mut desk = booted(&backend).await;

        desk.update_limits(LimitsUpdate {
            lead_cap: Some(250),
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(desk.banner().text(), "Limits saved: pro plan, cap 250.");
        assert_eq!(
            backend.calls(),
            vec!["GET /api/limits", "POST /api/limits", "GET /api/usage"]
        );
        assert!(desk.update_limits(LimitsUpdate::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_refresh_usage_reports_failure() {
        let backend = FakeBackend::new();
        let mut desk = booted(&backend).await;
        let before = desk.state().clone();

        backend.fail("GET /api/usage", 500, json!({"error": "usage offline"}));
        let err = desk.refresh_usage().await.unwrap_err();

        assert_eq!(err.to_string(), "usage offline");
        assert_eq!(desk.state(), &before);
    }
}
