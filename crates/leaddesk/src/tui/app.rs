//! TUI application state.

use tokio::sync::oneshot;

use leaddesk_core::{Intent, Snapshot, UiEvent};

/// A destructive action waiting for y/n.
#[derive(Debug)]
pub(super) struct PendingConfirm {
    pub prompt: String,
    reply: oneshot::Sender<bool>,
}

/// TUI application state.
///
/// The dashboard itself lives on the worker; the app only holds the last
/// published snapshot plus local editing state, and turns key presses into
/// [`Intent`]s for the event loop to submit.
#[derive(Debug, Default)]
pub struct App {
    /// Last state published by the worker
    pub snapshot: Snapshot,

    // Composer
    /// Current input text
    pub input: String,
    /// Cursor position in input, in characters
    pub cursor_pos: usize,

    // UI State
    /// Local feedback that is not an operation outcome (help, parse errors)
    pub notice: Option<String>,
    /// Whether the help overlay replaces the thread pane
    pub show_help: bool,
    /// Lines scrolled up from the newest message (0 = pinned to bottom)
    pub scroll_offset: u16,
    /// Whether the app should quit
    pub should_quit: bool,

    pub(super) confirm: Option<PendingConfirm>,

    // Command history
    pub(super) command_history: Vec<String>,
    pub(super) history_index: Option<usize>,
    pub(super) saved_input: String,

    // Tab completion
    pub(super) completions: Vec<String>,
    pub(super) completion_index: Option<usize>,

    // Intent accounting
    /// Intents handed to the worker so far
    pub(super) submitted: u64,
    /// Count the worker must reach before the pending send is finished
    pub(super) send_ticket: Option<u64>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts `intent` as submitted and hands it back for the event loop.
    pub(super) fn issue(&mut self, intent: Intent) -> Option<Intent> {
        self.submitted += 1;
        if matches!(intent, Intent::SendMessage(_)) {
            self.send_ticket = Some(self.submitted);
        }
        Some(intent)
    }

    /// Adopts a newly published snapshot.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let thread_changed = snapshot.state.thread() != self.snapshot.state.thread();
        self.snapshot = snapshot;
        if thread_changed {
            self.scroll_offset = 0;
        }
        if self
            .send_ticket
            .is_some_and(|ticket| self.snapshot.completed >= ticket)
        {
            self.send_ticket = None;
        }
    }

    /// Handles a side effect requested by the worker.
    pub fn handle_ui_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::ClearComposer => {
                self.clear_input();
                self.history_index = None;
                self.saved_input.clear();
            }
            UiEvent::Confirm { prompt, reply } => {
                self.confirm = Some(PendingConfirm { prompt, reply });
            }
        }
    }

    /// Whether a chat send is queued or in flight. The composer is locked
    /// until it finishes.
    pub fn is_sending(&self) -> bool {
        self.send_ticket.is_some() || self.snapshot.state.is_sending()
    }

    /// The confirmation question currently shown, if any.
    pub fn confirm_prompt(&self) -> Option<&str> {
        self.confirm.as_ref().map(|c| c.prompt.as_str())
    }

    /// Answers the pending confirmation.
    pub(super) fn answer_confirm(&mut self, yes: bool) {
        if let Some(pending) = self.confirm.take() {
            // the worker may have gone away; nothing to do then
            let _ = pending.reply.send(yes);
        }
    }

    /// Scroll the thread up by `lines`.
    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    /// Scroll the thread down by `lines`, towards the newest message.
    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }
}
