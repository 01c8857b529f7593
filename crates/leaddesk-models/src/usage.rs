//! Monthly usage and plan limits.

use serde::{Deserialize, Serialize};

/// Usage snapshot for the current billing month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub used_leads: u32,
    #[serde(default)]
    pub lead_cap: u32,
    #[serde(default)]
    pub month: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}

impl Usage {
    /// Leads that can still be engaged this month.
    pub fn remaining(&self) -> u32 {
        self.lead_cap.saturating_sub(self.used_leads)
    }

    /// Whether the cap has been reached.
    pub fn is_capped(&self) -> bool {
        self.lead_cap > 0 && self.used_leads >= self.lead_cap
    }
}

/// Plan limits configured on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(default = "default_plan")]
    pub plan: String,
    #[serde(default = "default_lead_cap")]
    pub lead_cap: u32,
    #[serde(default)]
    pub monthly_price_usd: u32,
}

fn default_plan() -> String {
    "pro".to_string()
}

fn default_lead_cap() -> u32 {
    100
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            plan: default_plan(),
            lead_cap: default_lead_cap(),
            monthly_price_usd: 0,
        }
    }
}
