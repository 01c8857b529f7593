//! Lead records.

use serde::{Deserialize, Serialize};

use crate::ids::LeadId;
use crate::null_as_empty;

/// Stage assigned by the backend to freshly created leads.
pub const NEW_STAGE: &str = "New";

/// Stage targeted by bulk delete when the operator does not pick one.
pub const LOST_STAGE: &str = "Lost";

/// Stages offered by the stage-move controls.
///
/// The stage set is owned by the backend; this list only feeds the UI and
/// is never used to reject a stage.
pub const DEFAULT_STAGES: &[&str] = &["New", "Contacted", "Engaged", "Estimate", "Won", "Lost"];

/// A prospective customer in the sales funnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub contact: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source: String,
    #[serde(default = "default_stage", deserialize_with = "stage_or_new")]
    pub stage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn default_stage() -> String {
    NEW_STAGE.to_string()
}

fn stage_or_new<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let stage = null_as_empty(deserializer)?;
    Ok(if stage.trim().is_empty() { default_stage() } else { stage })
}

impl Lead {
    /// Creates a lead in the default stage.
    pub fn new(id: impl Into<LeadId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            contact: String::new(),
            source: String::new(),
            stage: default_stage(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Sets the contact handle.
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = contact.into();
        self
    }

    /// Sets the acquisition source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Sets the funnel stage.
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = stage.into();
        self
    }

    /// Human-facing label: the name, else the contact, else the id.
    pub fn label(&self) -> &str {
        if !self.name.trim().is_empty() {
            &self.name
        } else if !self.contact.trim().is_empty() {
            &self.contact
        } else {
            self.id.as_str()
        }
    }
}

/// Payload for creating a lead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub contact: String,
    pub source: String,
}

impl NewLead {
    /// Builds a payload with every field trimmed.
    pub fn new(name: &str, contact: &str, source: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            contact: contact.trim().to_string(),
            source: source.trim().to_string(),
        }
    }

    /// A lead needs at least a name or a contact to be worth creating.
    pub fn is_identifiable(&self) -> bool {
        !self.name.is_empty() || !self.contact.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lead_tolerates_null_columns() {
        let lead: Lead = serde_json::from_value(json!({
            "id": "abc",
            "name": null,
            "contact": "@jo",
            "source": null,
            "stage": "Engaged",
            "created_at": "2026-01-02T03:04:05",
        }))
        .unwrap();

        assert_eq!(lead.name, "");
        assert_eq!(lead.contact, "@jo");
        assert_eq!(lead.stage, "Engaged");
        assert_eq!(lead.label(), "@jo");
        assert!(lead.updated_at.is_none());
    }

    #[test]
    fn test_lead_missing_stage_defaults_to_new() {
        let lead: Lead = serde_json::from_value(json!({"id": "x", "stage": null})).unwrap();
        assert_eq!(lead.stage, NEW_STAGE);
        assert_eq!(lead.label(), "x");
    }

    #[test]
    fn test_integer_ids_do_not_break_the_list() {
        let leads: Vec<Lead> = serde_json::from_value(json!([
            {"id": 12, "name": "Jo", "stage": "New"},
            {"id": "L2", "name": "Al", "stage": "Won"},
        ]))
        .unwrap();
        assert_eq!(leads[0].id.as_str(), "12");
        assert_eq!(leads[1].id.as_str(), "L2");
    }

    #[test]
    fn test_new_lead_trims_and_validates() {
        let blank = NewLead::new("  ", "\t", "ig");
        assert!(!blank.is_identifiable());

        let jo = NewLead::new(" Jo ", "", " ig ");
        assert!(jo.is_identifiable());
        assert_eq!(jo.name, "Jo");
        assert_eq!(jo.source, "ig");
    }

    #[test]
    fn test_default_stages_bracket_the_funnel() {
        assert_eq!(DEFAULT_STAGES.first(), Some(&NEW_STAGE));
        assert_eq!(DEFAULT_STAGES.last(), Some(&LOST_STAGE));
    }
}
