//! Command handlers for CLI subcommands.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use leaddesk_client::RemoteClient;
use leaddesk_core::{
    AssumeYes, BannerKind, Confirm, Dashboard, DeskConfig, IntegrationsUpdate, LimitsUpdate,
    OutboundDraft, Outcome,
};
use leaddesk_models::{Lead, LeadId, NewLead, Profile};

use crate::cli::{
    AutomationAction, Commands, IntegrationsCommands, OutboundCommands, OutboxCommands,
    OutputFormat, ProfileCommands,
};
use crate::tui::render;

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Profile keys accepted by `profile set` and `/profile`.
pub const PROFILE_KEYS: &[&str] = &[
    "biz_name", "biz_type", "offer", "location", "tone", "contact_method",
];

/// Keys accepted by `integrations set` and `/integrations`.
pub const INTEGRATION_KEYS: &[&str] = &["twilio", "sendgrid", "autosend", "channels"];

/// Asks on the terminal.
struct StdinConfirm;

#[async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || {
            print!("{} [y/N] ", prompt);
            if io::stdout().flush().is_err() {
                return false;
            }
            let mut answer = String::new();
            match io::stdin().lock().read_line(&mut answer) {
                Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
                Err(_) => false,
            }
        })
        .await
        .unwrap_or(false)
    }
}

/// Execute a CLI command.
pub async fn execute(command: Commands, config: &DeskConfig, assume_yes: bool) -> Result<()> {
    let client = RemoteClient::http(&config.base_url)?;
    debug!(base_url = %config.base_url, "executing command");

    let confirm: Arc<dyn Confirm> = if assume_yes {
        Arc::new(AssumeYes)
    } else {
        Arc::new(StdinConfirm)
    };
    let mut desk = Dashboard::new(client).with_confirm(confirm);

    match command {
        Commands::Tui => Ok(()),
        Commands::Leads { format } => cmd_leads(&mut desk, format).await,
        Commands::Thread { lead } => cmd_thread(&mut desk, &lead).await,
        Commands::Usage => cmd_usage(&mut desk).await,
        Commands::Send { lead, message } => cmd_send(&mut desk, &lead, &message).await,
        Commands::Add {
            name,
            contact,
            source,
        } => {
            let outcome = desk.add_lead(NewLead::new(&name, &contact, &source)).await?;
            report(&desk, outcome)
        }
        Commands::Stage { lead, stage } => {
            select(&mut desk, &lead).await?;
            let outcome = desk.move_stage(&stage).await?;
            report(&desk, outcome)
        }
        Commands::Delete { lead } => {
            select(&mut desk, &lead).await?;
            let outcome = desk.delete_active_lead().await?;
            report(&desk, outcome)
        }
        Commands::BulkDelete { stage } => {
            let outcome = desk.bulk_delete(Some(&stage)).await?;
            report(&desk, outcome)
        }
        Commands::Automation { action } => cmd_automation(&mut desk, action).await,
        Commands::Outbox { command } => match command {
            OutboxCommands::Enqueue { lead } => {
                select(&mut desk, &lead).await?;
                let outcome = desk.enqueue_last_reply().await?;
                report(&desk, outcome)
            }
            OutboxCommands::Run => {
                let outcome = desk.run_outbox().await?;
                report(&desk, outcome)
            }
        },
        Commands::Outbound { command } => match command {
            OutboundCommands::Queue {
                body,
                channel,
                to,
                subject,
                lead,
            } => {
                if let Some(lead) = lead {
                    select(&mut desk, &lead).await?;
                }
                let draft = OutboundDraft {
                    channel,
                    recipient: to.unwrap_or_default(),
                    subject,
                    body,
                };
                let outcome = desk.queue_outbound(draft).await?;
                report(&desk, outcome)
            }
            OutboundCommands::Run => {
                let outcome = desk.run_outbound().await?;
                report(&desk, outcome)
            }
        },
        Commands::Integrations { command } => cmd_integrations(&mut desk, command).await,
        Commands::Profile { command } => cmd_profile(&mut desk, command).await,
        Commands::Limits { cap, plan, price } => {
            let update = LimitsUpdate {
                lead_cap: cap,
                plan,
                monthly_price_usd: price,
            };
            cmd_limits(&mut desk, update).await
        }
        Commands::Health => cmd_health(&desk).await,
    }
}

async fn cmd_leads(desk: &mut Dashboard, format: OutputFormat) -> Result<()> {
    let leads = desk.client().list_leads().await?;

    match format {
        OutputFormat::Table => {
            if leads.is_empty() {
                println!("No leads found.");
                return Ok(());
            }

            println!("{:<12}  {:<10}  {:<24}  {:<24}  SOURCE", "ID", "STAGE", "NAME", "CONTACT");
            println!("{}", "-".repeat(84));
            for lead in &leads {
                println!(
                    "{:<12}  {:<10}  {:<24}  {:<24}  {}",
                    truncate(lead.id.as_str(), 12),
                    lead.stage,
                    truncate(&lead.name, 24),
                    truncate(&lead.contact, 24),
                    lead.source
                );
            }
            println!("\n{} lead(s)", leads.len());
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&leads)?;
            println!("{}", json);
        }
    }

    Ok(())
}

async fn cmd_thread(desk: &mut Dashboard, query: &str) -> Result<()> {
    select(desk, query).await?;
    let text = render::render_thread(desk.state().thread().messages());
    println!("{}", render::to_plain(&text));
    Ok(())
}

async fn cmd_usage(desk: &mut Dashboard) -> Result<()> {
    desk.refresh_usage().await?;
    let usage = desk.state().usage();
    println!("{}", render::to_plain(&render::render_usage(usage).into()));
    if usage.is_some_and(|u| u.is_capped()) {
        println!("Lead cap reached for this month.");
    }
    Ok(())
}

async fn cmd_send(desk: &mut Dashboard, query: &str, message: &str) -> Result<()> {
    select(desk, query).await?;
    let outcome = desk.send_message(message).await?;

    // the reply is the newest assistant message
    let messages = desk.state().thread().messages();
    if let Some(last) = messages.last() {
        let text = render::render_thread(std::slice::from_ref(last));
        println!("{}\n", render::to_plain(&text));
    }
    report(desk, outcome)
}

async fn cmd_automation(desk: &mut Dashboard, action: AutomationAction) -> Result<()> {
    match action {
        AutomationAction::Status => {
            let enabled = desk.client().automation_state().await?;
            println!("Auto-send: {}", if enabled { "ON" } else { "OFF" });
            Ok(())
        }
        AutomationAction::Toggle => {
            let outcome = desk.toggle_automation().await?;
            report(desk, outcome)
        }
    }
}

async fn cmd_profile(desk: &mut Dashboard, command: Option<ProfileCommands>) -> Result<()> {
    let current = desk.client().profile().await?;

    match command.unwrap_or(ProfileCommands::Show) {
        ProfileCommands::Show => {
            println!("{}", render::to_plain(&render::render_profile(Some(&current))));
            Ok(())
        }
        ProfileCommands::Set { fields } => {
            let profile = apply_profile_fields(current, &fields)?;
            let outcome = desk.save_profile(profile).await?;
            report(desk, outcome)
        }
    }
}

async fn cmd_integrations(
    desk: &mut Dashboard,
    command: Option<IntegrationsCommands>,
) -> Result<()> {
    match command.unwrap_or(IntegrationsCommands::Show) {
        IntegrationsCommands::Show => {
            desk.refresh_integrations().await?;
            let text = render::render_integrations(desk.state().integrations());
            println!("{}", render::to_plain(&text));
            Ok(())
        }
        IntegrationsCommands::Set { fields } => {
            let update = parse_integrations(&fields)?;
            let outcome = desk.update_integrations(update).await?;
            report(desk, outcome)
        }
    }
}

async fn cmd_limits(desk: &mut Dashboard, update: LimitsUpdate) -> Result<()> {
    if update.is_empty() {
        let limits = desk.client().limits().await?;
        println!("Plan:   {}", limits.plan);
        println!("Cap:    {} leads/month", limits.lead_cap);
        println!("Price:  ${}/month", limits.monthly_price_usd);
        return Ok(());
    }
    let outcome = desk.update_limits(update).await?;
    report(desk, outcome)
}

async fn cmd_health(desk: &Dashboard) -> Result<()> {
    let health = desk.client().health().await?;
    if !health.ok {
        return Err("Backend reported unhealthy".into());
    }
    let dialect = health.dialect.as_deref().unwrap_or("unknown");
    println!("Backend OK (database: {})", dialect);
    Ok(())
}

/// Loads leads and makes the one matching `query` active.
async fn select(desk: &mut Dashboard, query: &str) -> Result<()> {
    desk.load_all().await?;
    if desk.banner().kind() == BannerKind::Error {
        return Err(desk.banner().text().to_string().into());
    }
    let id = resolve_lead(desk.state().leads(), query)?;
    info!(lead_id = %id, "lead selected");
    desk.select_lead(&id).await?;
    Ok(())
}

/// Prints the outcome banner. An error banner fails the command even when
/// part of the operation went through.
fn report(desk: &Dashboard, outcome: Outcome) -> Result<()> {
    if outcome == Outcome::Cancelled {
        println!("Cancelled.");
        return Ok(());
    }
    let banner = desk.banner();
    match banner.kind() {
        BannerKind::Error => Err(banner.text().to_string().into()),
        _ if banner.is_clear() => Ok(()),
        _ => {
            println!("{}", banner.text());
            Ok(())
        }
    }
}

/// Finds a lead by exact id, then by case-insensitive name or contact.
pub fn resolve_lead(leads: &[Lead], query: &str) -> std::result::Result<LeadId, String> {
    let query = query.trim();
    if let Some(lead) = leads.iter().find(|l| l.id.as_str() == query) {
        return Ok(lead.id.clone());
    }

    let wanted = query.to_lowercase();
    let matches: Vec<&Lead> = leads
        .iter()
        .filter(|l| l.name.to_lowercase() == wanted || l.contact.to_lowercase() == wanted)
        .collect();

    match matches.as_slice() {
        [] => Err(format!("No lead matches \"{}\".", query)),
        [lead] => Ok(lead.id.clone()),
        many => Err(format!(
            "\"{}\" matches {} leads; use the id.",
            query,
            many.len()
        )),
    }
}

/// Applies `key=value` tokens to `profile`. A token without `=` continues
/// the previous value, so `offer=Free roof check` works unquoted.
pub fn apply_profile_fields(
    mut profile: Profile,
    fields: &[String],
) -> std::result::Result<Profile, String> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for token in fields {
        match token.split_once('=') {
            Some((key, value)) => pairs.push((key.trim().to_lowercase(), value.to_string())),
            None => match pairs.last_mut() {
                Some((_, value)) => {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(token);
                }
                None => return Err(format!("Expected key=value, got \"{}\".", token)),
            },
        }
    }

    for (key, value) in &pairs {
        if !profile.set_field(key, value.trim()) {
            return Err(format!(
                "Unknown profile field \"{}\". Keys: {}",
                key,
                PROFILE_KEYS.join(", ")
            ));
        }
    }
    Ok(profile)
}

/// Parses `cap=N plan=P price=N` tokens.
pub fn parse_limits(fields: &[String]) -> std::result::Result<LimitsUpdate, String> {
    let mut update = LimitsUpdate::default();
    for token in fields {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| format!("Expected key=value, got \"{}\".", token))?;
        let number = || {
            value
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("Invalid number for {}: {}", key, value))
        };
        match key.trim().to_lowercase().as_str() {
            "cap" | "lead_cap" => update.lead_cap = Some(number()?),
            "plan" => update.plan = Some(value.trim().to_string()),
            "price" | "monthly_price_usd" => update.monthly_price_usd = Some(number()?),
            other => return Err(format!("Unknown limit \"{}\". Keys: cap, plan, price", other)),
        }
    }
    Ok(update)
}

/// Parses `twilio=on sendgrid=off autosend=on channels=sms,email` tokens.
pub fn parse_integrations(fields: &[String]) -> std::result::Result<IntegrationsUpdate, String> {
    let mut update = IntegrationsUpdate::default();
    for token in fields {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| format!("Expected key=value, got \"{}\".", token))?;
        if !update.set(key, value) {
            return Err(format!(
                "Invalid integration setting \"{}\". Keys: {}; values on/off",
                token,
                INTEGRATION_KEYS.join(", ")
            ));
        }
    }
    Ok(update)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
