//! Tab completion for TUI slash commands.

use leaddesk_models::DEFAULT_STAGES;

use super::app::App;

/// Available slash commands for completion.
pub const COMMANDS: &[&str] = &[
    "/add", "/auto", "/bulk-delete", "/delete", "/enqueue", "/find", "/help",
    "/integrations", "/limits", "/outbound", "/profile", "/quit", "/reload", "/run",
    "/stage", "/usage",
];

const PROFILE_KEYS: &[&str] = &[
    "biz_name=", "biz_type=", "offer=", "location=", "tone=", "contact_method=",
];

const INTEGRATION_KEYS: &[&str] = &["twilio=", "sendgrid=", "autosend=", "channels="];

/// Candidates for the current input, as whole replacement lines.
fn candidates(input: &str) -> Vec<String> {
    let extend = |command: &str, words: &[&str]| -> Vec<String> {
        let partial = input[command.len()..].to_lowercase();
        words
            .iter()
            .filter(|w| w.to_lowercase().starts_with(&partial))
            .map(|w| format!("{}{}", command, w))
            .collect()
    };

    if input.starts_with("/stage ") {
        extend("/stage ", DEFAULT_STAGES)
    } else if input.starts_with("/bulk-delete ") {
        extend("/bulk-delete ", DEFAULT_STAGES)
    } else if input.starts_with("/profile ") && !input.contains('=') {
        extend("/profile ", PROFILE_KEYS)
    } else if input.starts_with("/integrations ") && !input.contains('=') {
        extend("/integrations ", INTEGRATION_KEYS)
    } else {
        COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(input))
            .map(|s| s.to_string())
            .collect()
    }
}

impl App {
    /// Perform tab completion on the current input.
    pub fn complete_command(&mut self) {
        // Only complete if input starts with /
        if !self.input.starts_with('/') {
            self.reset_completions();
            return;
        }

        // Build completions if not already built for this prefix
        if self.completions.is_empty() || self.completion_index.is_none() {
            self.completions = candidates(&self.input);
            self.completion_index = if self.completions.is_empty() {
                None
            } else {
                Some(0)
            };
        } else if let Some(idx) = self.completion_index {
            self.completion_index = Some((idx + 1) % self.completions.len());
        }

        if let Some(completion) = self.completion_index.and_then(|i| self.completions.get(i)) {
            self.input = completion.clone();
            self.move_cursor_end();
        }
    }

    /// Reset completion state (called when input changes).
    pub fn reset_completions(&mut self) {
        self.completions.clear();
        self.completion_index = None;
    }
}
