//! Terminal User Interface for LeadDesk.
//!
//! Provides a multi-pane TUI with:
//! - Header showing the active lead, usage and the auto-send flag
//! - Lead list with the active lead highlighted
//! - Conversation thread pinned to the newest message
//! - Business profile pane
//! - Banner with the outcome of the last operation
//! - Composer for messages and slash commands

mod app;
mod commands;
mod completion;
mod events;
mod input;
pub mod render;
mod ui;

pub use app::App;
pub use events::run;
