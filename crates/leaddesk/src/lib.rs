//! LeadDesk terminal dashboard and CLI.
//!
//! The TUI and the one-shot subcommands drive the same
//! [`leaddesk_core::Dashboard`]; the TUI through the serialized worker,
//! the subcommands directly.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod tui;
