//! The view state: the client's mirror of the backend.
//!
//! Fields are private and only the reconciliation methods below change
//! them, so selection can never point at a lead that is not in the list and
//! a thread can never outlive the selection it was fetched for.

use leaddesk_models::{IntegrationSettings, Lead, LeadId, Message, Profile, Usage};

/// Messages on screen and the lead they were fetched for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Thread {
    lead_id: Option<LeadId>,
    messages: Vec<Message>,
}

impl Thread {
    pub fn lead_id(&self) -> Option<&LeadId> {
        self.lead_id.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

/// Everything the dashboard displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    leads: Vec<Lead>,
    active_lead_id: Option<LeadId>,
    thread: Thread,
    profile: Option<Profile>,
    usage: Option<Usage>,
    integrations: Option<IntegrationSettings>,
    auto_send_enabled: bool,
    sending: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the lead list and re-derives the selection.
    ///
    /// The current selection survives if it is still listed; otherwise the
    /// first lead becomes active, or nothing when the list is empty.
    pub fn reconcile_leads(&mut self, leads: Vec<Lead>) {
        self.leads = leads;
        let still_listed = self
            .active_lead_id
            .as_ref()
            .is_some_and(|id| self.leads.iter().any(|l| &l.id == id));
        if !still_listed {
            self.active_lead_id = self.leads.first().map(|l| l.id.clone());
        }
        self.drop_stale_thread();
    }

    /// Sets the selection without checking the list. Used right after a
    /// create, when the id is known before the list reload.
    pub fn set_active(&mut self, id: LeadId) {
        self.active_lead_id = Some(id);
        self.drop_stale_thread();
    }

    /// Drops the selection, ahead of a reload that will re-derive it.
    pub fn clear_active(&mut self) {
        self.active_lead_id = None;
        self.drop_stale_thread();
    }

    /// Shows `messages` as the thread of `lead_id`.
    pub fn apply_thread(&mut self, lead_id: LeadId, messages: Vec<Message>) {
        self.thread = Thread {
            lead_id: Some(lead_id),
            messages,
        };
    }

    pub fn clear_thread(&mut self) {
        self.thread = Thread::default();
    }

    pub fn apply_usage(&mut self, usage: Option<Usage>) {
        self.usage = usage;
    }

    pub fn apply_profile(&mut self, profile: Profile) {
        self.profile = Some(profile);
    }

    pub fn apply_integrations(&mut self, integrations: Option<IntegrationSettings>) {
        self.integrations = integrations;
    }

    pub fn set_automation(&mut self, enabled: bool) {
        self.auto_send_enabled = enabled;
    }

    pub(crate) fn set_sending(&mut self, sending: bool) {
        self.sending = sending;
    }

    fn drop_stale_thread(&mut self) {
        if self.thread.lead_id.is_some() && self.thread.lead_id != self.active_lead_id {
            self.clear_thread();
        }
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn lead(&self, id: &LeadId) -> Option<&Lead> {
        self.leads.iter().find(|l| &l.id == id)
    }

    pub fn active_lead_id(&self) -> Option<&LeadId> {
        self.active_lead_id.as_ref()
    }

    /// The active lead, if it is in the list.
    pub fn active_lead(&self) -> Option<&Lead> {
        self.active_lead_id.as_ref().and_then(|id| self.lead(id))
    }

    /// Position of the active lead in the list.
    pub fn active_index(&self) -> Option<usize> {
        let id = self.active_lead_id.as_ref()?;
        self.leads.iter().position(|l| &l.id == id)
    }

    pub fn thread(&self) -> &Thread {
        &self.thread
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn usage(&self) -> Option<&Usage> {
        self.usage.as_ref()
    }

    /// Integration switches, when they could be loaded.
    pub fn integrations(&self) -> Option<&IntegrationSettings> {
        self.integrations.as_ref()
    }

    pub fn auto_send_enabled(&self) -> bool {
        self.auto_send_enabled
    }

    /// Whether a chat send is in flight.
    pub fn is_sending(&self) -> bool {
        self.sending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leads(ids: &[&str]) -> Vec<Lead> {
        ids.iter().map(|id| Lead::new(*id, format!("lead {}", id))).collect()
    }

    #[test]
    fn test_reconcile_keeps_listed_selection() {
        let mut state = ViewState::new();
        state.reconcile_leads(leads(&["L1", "L2"]));
        assert_eq!(state.active_lead_id(), Some(&LeadId::from("L1")));

        state.set_active(LeadId::from("L2"));
        state.reconcile_leads(leads(&["L3", "L2"]));
        assert_eq!(state.active_lead_id(), Some(&LeadId::from("L2")));
        assert_eq!(state.active_index(), Some(1));
    }

    #[test]
    fn test_reconcile_falls_back_to_first_or_none() {
        let mut state = ViewState::new();
        state.reconcile_leads(leads(&["L1", "L2"]));
        state.set_active(LeadId::from("L1"));

        state.reconcile_leads(leads(&["L2"]));
        assert_eq!(state.active_lead_id(), Some(&LeadId::from("L2")));

        state.reconcile_leads(Vec::new());
        assert_eq!(state.active_lead_id(), None);
        assert!(state.active_lead().is_none());
    }

    #[test]
    fn test_selection_always_valid_across_reconciles() {
        let lists: [&[&str]; 5] = [&["A", "B", "C"], &["C", "B"], &[], &["D"], &["B", "D"]];
        let mut state = ViewState::new();
        for list in lists {
            state.reconcile_leads(leads(list));
            match state.active_lead_id() {
                Some(id) => assert!(state.lead(id).is_some()),
                None => assert!(state.leads().is_empty()),
            }
        }
    }

    #[test]
    fn test_thread_dropped_when_selection_moves() {
        let mut state = ViewState::new();
        state.reconcile_leads(leads(&["L1", "L2"]));
        state.apply_thread(LeadId::from("L1"), vec![Message::user("hi")]);

        state.reconcile_leads(leads(&["L1", "L2"]));
        assert_eq!(state.thread().messages().len(), 1);

        state.reconcile_leads(leads(&["L2"]));
        assert!(state.thread().messages().is_empty());
        assert_eq!(state.thread().lead_id(), None);
    }

    #[test]
    fn test_clear_active_drops_thread() {
        let mut state = ViewState::new();
        state.reconcile_leads(leads(&["L1"]));
        state.apply_thread(LeadId::from("L1"), vec![Message::assistant("hello")]);

        state.clear_active();
        assert_eq!(state.active_lead_id(), None);
        assert!(state.thread().messages().is_empty());
    }
}
