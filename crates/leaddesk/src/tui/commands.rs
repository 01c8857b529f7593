//! Slash command handling for the TUI.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use leaddesk_core::{Intent, OutboundDraft};
use leaddesk_models::{Lead, NewLead};

use super::app::App;
use crate::commands::{apply_profile_fields, parse_integrations, parse_limits};

const HELP: &str = "\
=== Commands ===
  /add name | contact | source   Add a lead
  /stage <stage>                 Move the active lead
  /delete                        Delete the active lead
  /bulk-delete [stage]           Delete every lead in a stage (default Lost)
  /auto                          Toggle auto-send
  /enqueue                       Queue the last reply for the active lead
  /run                           Run the outbox now
  /outbound [channel=sms] [to=R] [subject=S] <text>
                                 Queue a message (to defaults to the lead's contact)
  /outbound run                  Deliver the outbound queue
  /integrations [key=value ...]  Show or change integrations
                                 keys: twilio sendgrid autosend channels
  /profile key=value ...         Edit the business profile
                                 keys: biz_name biz_type offer location tone contact_method
  /limits cap=N plan=P price=N   Change plan limits
  /usage                         Refresh usage
  /find <text>                   Jump to the best matching lead
  /reload                        Reload everything from the backend
  /help                          Toggle this help
  /quit                          Exit

=== Keyboard ===
  Enter       Send message / run command
  Up/Down     Select lead
  Ctrl+P/N    Command history
  PgUp/PgDn   Scroll conversation
  Tab         Complete command
  Esc         Close help, or quit
  Ctrl+C      Quit";

impl App {
    /// The help text shown in place of the thread.
    pub fn help_text() -> &'static str {
        HELP
    }

    /// Handle a slash command (without the leading `/`).
    pub(super) fn handle_command(&mut self, cmd: &str) -> Option<Intent> {
        let (command, arg) = match cmd.split_once(char::is_whitespace) {
            Some((command, rest)) => (command.to_lowercase(), rest.trim()),
            None => (cmd.to_lowercase(), ""),
        };

        match command.as_str() {
            "help" | "h" | "?" => {
                self.show_help = !self.show_help;
                None
            }
            "quit" | "q" | "exit" => {
                self.should_quit = true;
                None
            }
            "add" => {
                let mut parts = arg.split('|');
                let lead = NewLead::new(
                    parts.next().unwrap_or_default(),
                    parts.next().unwrap_or_default(),
                    parts.next().unwrap_or_default(),
                );
                self.issue(Intent::AddLead(lead))
            }
            "stage" | "move" => self.issue(Intent::MoveStage(arg.to_string())),
            "delete" => self.issue(Intent::DeleteActiveLead),
            "bulk-delete" => {
                let stage = (!arg.is_empty()).then(|| arg.to_string());
                self.issue(Intent::BulkDelete(stage))
            }
            "auto" => self.issue(Intent::ToggleAutomation),
            "enqueue" => self.issue(Intent::EnqueueLastReply),
            "run" => self.issue(Intent::RunOutbox),
            "usage" => self.issue(Intent::RefreshUsage),
            "reload" => self.issue(Intent::Boot),
            "outbound" if arg.eq_ignore_ascii_case("run") => self.issue(Intent::RunOutbound),
            "outbound" => match parse_outbound(arg) {
                Ok(draft) => self.issue(Intent::QueueOutbound(draft)),
                Err(e) => {
                    self.notice = Some(e);
                    None
                }
            },
            "integrations" if arg.is_empty() => self.issue(Intent::RefreshIntegrations),
            "integrations" => {
                let fields: Vec<String> = arg.split_whitespace().map(str::to_string).collect();
                match parse_integrations(&fields) {
                    Ok(update) => self.issue(Intent::UpdateIntegrations(update)),
                    Err(e) => {
                        self.notice = Some(e);
                        None
                    }
                }
            }
            "profile" => {
                if arg.is_empty() {
                    self.notice = Some("Usage: /profile key=value ...".to_string());
                    return None;
                }
                let base = self.snapshot.state.profile().cloned().unwrap_or_default();
                let fields: Vec<String> = arg.split_whitespace().map(str::to_string).collect();
                match apply_profile_fields(base, &fields) {
                    Ok(profile) => self.issue(Intent::SaveProfile(profile)),
                    Err(e) => {
                        self.notice = Some(e);
                        None
                    }
                }
            }
            "limits" => {
                let fields: Vec<String> = arg.split_whitespace().map(str::to_string).collect();
                match parse_limits(&fields) {
                    Ok(update) => self.issue(Intent::UpdateLimits(update)),
                    Err(e) => {
                        self.notice = Some(e);
                        None
                    }
                }
            }
            "find" => match best_match(self.snapshot.state.leads(), arg) {
                Some(lead) => {
                    let id = lead.id.clone();
                    self.issue(Intent::SelectLead(id))
                }
                None => {
                    self.notice = Some(format!("No lead matches \"{}\".", arg));
                    None
                }
            },
            _ => {
                self.notice = Some(format!("Unknown command: /{}. Type /help", command));
                None
            }
        }
    }
}

/// Splits leading `channel=`, `to=` and `subject=` tokens from the body.
fn parse_outbound(arg: &str) -> Result<OutboundDraft, String> {
    let mut draft = OutboundDraft::default();
    let mut rest = arg.trim();
    while !rest.is_empty() {
        let (token, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let Some((key, value)) = token.split_once('=') else {
            break;
        };
        match key.to_lowercase().as_str() {
            "channel" => draft.channel = value.to_string(),
            "to" => draft.recipient = value.to_string(),
            "subject" => draft.subject = value.to_string(),
            _ => break,
        }
        rest = tail.trim_start();
    }
    if rest.trim().is_empty() {
        return Err("Usage: /outbound [channel=sms] [to=R] [subject=S] <text>".to_string());
    }
    draft.body = rest.trim().to_string();
    Ok(draft)
}

/// Best fuzzy match for `query` over lead name, contact and source.
fn best_match<'a>(leads: &'a [Lead], query: &str) -> Option<&'a Lead> {
    if query.is_empty() {
        return None;
    }
    let matcher = SkimMatcherV2::default();
    leads
        .iter()
        .filter_map(|lead| {
            let haystack = format!("{} {} {}", lead.name, lead.contact, lead.source);
            matcher.fuzzy_match(&haystack, query).map(|score| (score, lead))
        })
        .max_by_key(|(score, _)| *score)
        .map(|(_, lead)| lead)
}
