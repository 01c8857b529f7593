//! Event handling for the TUI.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{info, warn};

use leaddesk_client::RemoteClient;
use leaddesk_core::{
    spawn_worker, with_channel_confirm, Dashboard, DeskConfig, DeskHandle, Intent, UiEvent,
};

use super::app::App;
use super::ui;

/// Result type for TUI operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Lines moved per PgUp/PgDn.
const PAGE: u16 = 10;

/// Initialize the terminal for TUI mode.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI against the backend named in `config`.
pub fn run(runtime: &Runtime, config: &DeskConfig) -> Result<()> {
    // the worker is spawned onto this runtime
    let _guard = runtime.enter();

    let client = RemoteClient::http(&config.base_url)?;
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let dashboard = with_channel_confirm(Dashboard::new(client), &events_tx);
    let (desk, worker) = spawn_worker(dashboard, events_tx);
    info!(base_url = %config.base_url, "tui started");

    let mut terminal = setup_terminal()?;
    let mut app = App::new();

    if let Some(intent) = app.issue(Intent::Boot) {
        desk.submit(intent)?;
    }

    let result = run_loop(&mut terminal, &mut app, &desk, events_rx);

    restore_terminal(&mut terminal)?;

    // dropping the last handle closes the intent queue
    drop(desk);
    if let Err(e) = runtime.block_on(worker) {
        warn!(error = %e, "worker did not shut down cleanly");
    }
    info!("tui stopped");

    result
}

/// Main event loop.
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    desk: &DeskHandle,
    mut events: mpsc::UnboundedReceiver<UiEvent>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut snapshots = desk.subscribe();

    loop {
        while let Ok(event) = events.try_recv() {
            app.handle_ui_event(event);
        }
        if snapshots.has_changed().unwrap_or(false) {
            app.apply_snapshot(snapshots.borrow_and_update().clone());
        }

        // Draw UI
        terminal.draw(|f| ui::draw(f, app))?;

        // Poll for events with timeout
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    if let Some(intent) = app.handle_key(key) {
                        desk.submit(intent)?;
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

impl App {
    /// Applies a key press. Returns an intent for the worker, if the key
    /// asked for one.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Intent> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Handle Ctrl+C to quit
        if ctrl && key.code == KeyCode::Char('c') {
            self.answer_confirm(false);
            self.should_quit = true;
            return None;
        }

        if self.confirm.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.answer_confirm(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc | KeyCode::Enter => {
                    self.answer_confirm(false)
                }
                _ => {}
            }
            return None;
        }

        if ctrl {
            match key.code {
                KeyCode::Char('p') => self.history_prev(),
                KeyCode::Char('n') => self.history_next(),
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Enter => return self.submit(),
            KeyCode::Up => return self.issue(Intent::SelectPrevious),
            KeyCode::Down => return self.issue(Intent::SelectNext),
            KeyCode::PageUp => self.scroll_up(PAGE),
            KeyCode::PageDown => self.scroll_down(PAGE),
            KeyCode::Esc => {
                if self.show_help || self.notice.is_some() {
                    self.show_help = false;
                    self.notice = None;
                } else {
                    self.should_quit = true;
                }
            }
            _ if self.is_sending() => {
                // composer is locked while a send is in flight
            }
            KeyCode::Tab => self.complete_command(),
            KeyCode::Char(c) => {
                self.reset_completions();
                self.enter_char(c);
            }
            KeyCode::Backspace => {
                self.reset_completions();
                self.delete_char();
            }
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.move_cursor_home(),
            KeyCode::End => self.move_cursor_end(),
            _ => {}
        }
        None
    }
}
