//! Command-line interface definition using clap.

use clap::{Parser, Subcommand, ValueEnum};

use leaddesk_core::config::{DeskConfig, BASE_URL_ENV};

/// LeadDesk - sales dashboard for the terminal
#[derive(Parser, Debug)]
#[command(name = "leaddesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Backend base URL
    #[arg(long, env = BASE_URL_ENV, global = true)]
    pub base_url: Option<String>,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive dashboard (default)
    Tui,

    /// List leads
    Leads {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show a lead's conversation
    Thread {
        /// Lead id or name
        lead: String,
    },

    /// Show this month's usage
    Usage,

    /// Send a message to a lead and generate a reply
    Send {
        /// Lead id or name
        lead: String,

        /// Message text
        message: String,
    },

    /// Add a lead
    Add {
        /// Lead name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Contact handle (phone, email, @handle)
        #[arg(short, long, default_value = "")]
        contact: String,

        /// Where the lead came from
        #[arg(short, long, default_value = "")]
        source: String,
    },

    /// Move a lead to another stage
    Stage {
        /// Lead id or name
        lead: String,

        /// Target stage (New, Contacted, Engaged, Estimate, Won, Lost)
        stage: String,
    },

    /// Delete a lead
    Delete {
        /// Lead id or name
        lead: String,
    },

    /// Delete every lead in a stage
    BulkDelete {
        /// Stage to clear
        #[arg(short, long, default_value = "Lost")]
        stage: String,
    },

    /// Show or toggle auto-send
    Automation {
        #[arg(value_enum, default_value = "status")]
        action: AutomationAction,
    },

    /// Outbox pipeline steps
    Outbox {
        #[command(subcommand)]
        command: OutboxCommands,
    },

    /// Manual outbound queue, separate from reply auto-send
    Outbound {
        #[command(subcommand)]
        command: OutboundCommands,
    },

    /// Show or change delivery integrations
    Integrations {
        #[command(subcommand)]
        command: Option<IntegrationsCommands>,
    },

    /// Show or edit the business profile
    Profile {
        #[command(subcommand)]
        command: Option<ProfileCommands>,
    },

    /// Show or change plan limits
    Limits {
        /// Monthly lead cap
        #[arg(long)]
        cap: Option<u32>,

        /// Plan name
        #[arg(long)]
        plan: Option<String>,

        /// Monthly price in USD
        #[arg(long)]
        price: Option<u32>,
    },

    /// Check that the backend is reachable
    Health,
}

/// Auto-send actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AutomationAction {
    #[default]
    Status,
    Toggle,
}

/// Outbox subcommands.
#[derive(Subcommand, Debug)]
pub enum OutboxCommands {
    /// Queue a lead's latest reply
    Enqueue {
        /// Lead id or name
        lead: String,
    },

    /// Process everything queued
    Run,
}

/// Outbound subcommands.
#[derive(Subcommand, Debug)]
pub enum OutboundCommands {
    /// Queue a message
    Queue {
        /// Message body
        body: String,

        /// Delivery channel (sms, email)
        #[arg(short, long, default_value = "sms")]
        channel: String,

        /// Recipient; defaults to the lead's contact
        #[arg(short, long)]
        to: Option<String>,

        /// Subject line for email
        #[arg(short, long, default_value = "")]
        subject: String,

        /// Lead id or name to attach the message to
        #[arg(short, long)]
        lead: Option<String>,
    },

    /// Deliver everything queued
    Run,
}

/// Integrations subcommands.
#[derive(Subcommand, Debug)]
pub enum IntegrationsCommands {
    /// Print the switches
    Show,

    /// Change switches, e.g. `twilio=on autosend=off channels=sms`
    Set {
        #[arg(required = true)]
        fields: Vec<String>,
    },
}

/// Profile subcommands.
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Print the profile
    Show,

    /// Update fields, e.g. `tone=friendly "offer=Free estimate"`
    Set {
        #[arg(required = true)]
        fields: Vec<String>,
    },
}

/// Output format for list commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Cli {
    /// Environment config with command-line overrides applied.
    pub fn config(&self) -> DeskConfig {
        let config = DeskConfig::from_env();
        match &self.base_url {
            Some(url) if !url.trim().is_empty() => config.with_base_url(url.as_str()),
            _ => config,
        }
    }

    /// Whether this run opens the TUI.
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Tui))
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
