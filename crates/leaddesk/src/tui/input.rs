//! Input handling for the TUI.
//!
//! Contains methods for cursor movement, character input,
//! command history navigation, and input submission.

use leaddesk_core::Intent;

use super::app::App;

impl App {
    /// Byte offset of the cursor within `input`.
    fn cursor_byte(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn input_chars(&self) -> usize {
        self.input.chars().count()
    }

    /// Handle character input.
    pub fn enter_char(&mut self, c: char) {
        let at = self.cursor_byte();
        self.input.insert(at, c);
        self.cursor_pos += 1;
    }

    /// Delete character before cursor.
    pub fn delete_char(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
            let at = self.cursor_byte();
            self.input.remove(at);
        }
    }

    /// Move cursor left.
    pub fn move_cursor_left(&mut self) {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_cursor_right(&mut self) {
        if self.cursor_pos < self.input_chars() {
            self.cursor_pos += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_pos = self.input_chars();
    }

    /// Clear the input.
    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
    }

    /// Submit the current input.
    ///
    /// Slash commands clear the composer straight away. A chat message stays
    /// in the composer until the worker reports it was sent, so a failed
    /// send can be retried without retyping.
    pub fn submit(&mut self) -> Option<Intent> {
        if self.is_sending() {
            return None;
        }

        let input = self.input.trim().to_string();
        self.history_index = None;
        self.saved_input.clear();
        self.notice = None;

        if input.is_empty() {
            return None;
        }

        // Add to history (avoid duplicates of last entry)
        if self.command_history.last() != Some(&input) {
            self.command_history.push(input.clone());
        }

        if let Some(cmd) = input.strip_prefix('/') {
            self.clear_input();
            self.handle_command(cmd)
        } else {
            self.issue(Intent::SendMessage(input))
        }
    }

    /// Navigate to previous command in history.
    pub fn history_prev(&mut self) {
        if self.command_history.is_empty() {
            return;
        }

        match self.history_index {
            None => {
                self.saved_input = std::mem::take(&mut self.input);
                self.history_index = Some(self.command_history.len() - 1);
                self.input = self.command_history.last().cloned().unwrap_or_default();
            }
            Some(idx) if idx > 0 => {
                self.history_index = Some(idx - 1);
                self.input = self.command_history.get(idx - 1).cloned().unwrap_or_default();
            }
            _ => {
                // Already at oldest entry
            }
        }
        self.move_cursor_end();
    }

    /// Navigate to next command in history.
    pub fn history_next(&mut self) {
        if let Some(idx) = self.history_index {
            if idx + 1 < self.command_history.len() {
                self.history_index = Some(idx + 1);
                self.input = self.command_history.get(idx + 1).cloned().unwrap_or_default();
            } else {
                // Return to saved input
                self.history_index = None;
                self.input = std::mem::take(&mut self.saved_input);
            }
            self.move_cursor_end();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaddesk_core::Snapshot;

    fn typed(text: &str) -> App {
        let mut app = App::new();
        for c in text.chars() {
            app.enter_char(c);
        }
        app
    }

    #[test]
    fn test_editing_is_char_aware() {
        let mut app = typed("héllo");
        assert_eq!(app.cursor_pos, 5);
        app.move_cursor_left();
        app.move_cursor_left();
        app.move_cursor_left();
        app.move_cursor_left();
        app.delete_char();
        assert_eq!(app.input, "éllo");
        app.enter_char('ü');
        assert_eq!(app.input, "üéllo");
        app.move_cursor_end();
        assert_eq!(app.cursor_pos, 5);
    }

    #[test]
    fn test_message_submit_keeps_text_until_sent() {
        let mut app = typed("do you fix roofs?");
        let intent = app.submit();
        assert_eq!(intent, Some(Intent::SendMessage("do you fix roofs?".into())));
        assert_eq!(app.input, "do you fix roofs?");
        assert!(app.is_sending());

        // locked while the send is in flight
        assert_eq!(app.submit(), None);
    }

    #[test]
    fn test_slash_command_clears_composer() {
        let mut app = typed("/auto");
        assert_eq!(app.submit(), Some(Intent::ToggleAutomation));
        assert!(app.input.is_empty());
        assert!(!app.is_sending());
    }

    #[test]
    fn test_blank_submit_does_nothing() {
        let mut app = typed("   ");
        assert_eq!(app.submit(), None);
        assert_eq!(app.submitted, 0);
    }

    #[test]
    fn test_history_navigation() {
        let mut app = typed("/usage");
        app.submit();
        app.apply_snapshot(Snapshot {
            completed: 1,
            ..Default::default()
        });
        for c in "/run".chars() {
            app.enter_char(c);
        }
        app.submit();

        for c in "draft".chars() {
            app.enter_char(c);
        }
        app.history_prev();
        assert_eq!(app.input, "/run");
        app.history_prev();
        assert_eq!(app.input, "/usage");
        app.history_prev();
        assert_eq!(app.input, "/usage");
        app.history_next();
        app.history_next();
        assert_eq!(app.input, "draft");
        assert_eq!(app.cursor_pos, 5);
    }
}
