//! Pure projections from state slices to display text.
//!
//! Renderers never fetch or mutate anything. Absent or empty inputs render
//! an explicit placeholder so "nothing there" never looks like "not loaded
//! yet". The CLI reuses them through [`to_plain`].

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};

use leaddesk_core::{Banner, BannerKind};
use leaddesk_models::{IntegrationSettings, Lead, LeadId, Message, Profile, Role, Usage};

const PLACEHOLDER: Style = Style::new().fg(Color::DarkGray).add_modifier(Modifier::ITALIC);

/// One row per lead; the active one is marked and highlighted.
pub fn render_lead_list(leads: &[Lead], active_id: Option<&LeadId>) -> Text<'static> {
    if leads.is_empty() {
        return Text::from(Line::styled("No leads yet. Add one with /add", PLACEHOLDER));
    }

    let lines: Vec<Line> = leads
        .iter()
        .map(|lead| {
            let active = active_id == Some(&lead.id);
            let (marker, name_style) = if active {
                (
                    "> ",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )
            } else {
                ("  ", Style::default())
            };
            Line::from(vec![
                Span::styled(marker, name_style),
                Span::styled(lead.label().to_string(), name_style),
                Span::styled(
                    format!("  [{}]", lead.stage),
                    Style::default().fg(stage_color(&lead.stage)),
                ),
            ])
        })
        .collect();
    Text::from(lines)
}

fn stage_color(stage: &str) -> Color {
    match stage {
        "Won" => Color::Green,
        "Lost" => Color::Red,
        "New" => Color::Cyan,
        _ => Color::Blue,
    }
}

/// The conversation, oldest first.
pub fn render_thread(messages: &[Message]) -> Text<'static> {
    if messages.is_empty() {
        return Text::from(Line::styled("No messages yet.", PLACEHOLDER));
    }

    let mut lines = Vec::new();
    for (i, msg) in messages.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        let (who, color) = match msg.role {
            Role::User => ("Lead", Color::Cyan),
            Role::Assistant => ("Reply", Color::Green),
            Role::Other => ("Note", Color::DarkGray),
        };
        let mut header = vec![Span::styled(
            who,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )];
        if let Some(ts) = msg.timestamp() {
            header.push(Span::styled(
                format!("  {}", ts.format("%b %d %H:%M")),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(header));
        for text in msg.content.lines() {
            lines.push(Line::raw(text.to_string()));
        }
    }
    Text::from(lines)
}

/// Scroll offset that pins the last line of `text` to the bottom of a
/// `width` x `height` area, accounting for wrapping.
pub fn thread_scroll(text: &Text, width: u16, height: u16) -> u16 {
    let width = width as usize;
    let total: usize = text
        .lines
        .iter()
        .map(|line| {
            let len = line.width();
            if width == 0 || len == 0 {
                1
            } else {
                len.div_ceil(width)
            }
        })
        .sum();
    total.saturating_sub(height as usize).min(u16::MAX as usize) as u16
}

/// Summary of the active lead.
pub fn render_active_meta(lead: Option<&Lead>) -> Line<'static> {
    let Some(lead) = lead else {
        return Line::styled("No lead selected", PLACEHOLDER);
    };

    let mut spans = vec![Span::styled(
        lead.label().to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for extra in [&lead.contact, &lead.source] {
        if !extra.trim().is_empty() {
            spans.push(Span::raw(format!(" · {}", extra)));
        }
    }
    spans.push(Span::styled(
        format!(" · {}", lead.stage),
        Style::default().fg(stage_color(&lead.stage)),
    ));
    Line::from(spans)
}

/// Monthly usage against the cap.
pub fn render_usage(usage: Option<&Usage>) -> Line<'static> {
    let Some(usage) = usage else {
        return Line::styled("Usage unavailable", PLACEHOLDER);
    };

    let style = if usage.is_capped() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let mut text = format!("Leads {}/{}", usage.used_leads, usage.lead_cap);
    match (&usage.plan, usage.month.is_empty()) {
        (Some(plan), false) => text.push_str(&format!(" ({}, {})", usage.month, plan)),
        (Some(plan), true) => text.push_str(&format!(" ({})", plan)),
        (None, false) => text.push_str(&format!(" ({})", usage.month)),
        (None, true) => {}
    }
    Line::styled(text, style)
}

/// Auto-send flag.
pub fn render_automation(enabled: bool) -> Line<'static> {
    if enabled {
        Line::from(vec![
            Span::raw("Auto-send: "),
            Span::styled("ON", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        ])
    } else {
        Line::from(vec![
            Span::raw("Auto-send: "),
            Span::styled("OFF", Style::default().fg(Color::DarkGray)),
        ])
    }
}

/// Business profile fields.
pub fn render_profile(profile: Option<&Profile>) -> Text<'static> {
    let Some(p) = profile else {
        return Text::from(Line::styled("Profile not loaded.", PLACEHOLDER));
    };

    let rows = [
        ("Business", p.biz_name.as_str()),
        ("Type", p.biz_type.as_str()),
        ("Offer", p.offer.as_str()),
        ("Location", p.location.as_str()),
        ("Tone", p.tone.as_str()),
        ("Contact", p.contact_method.as_str()),
    ];
    let lines: Vec<Line> = rows
        .into_iter()
        .map(|(key, value)| {
            let value = if value.trim().is_empty() {
                Span::styled("-", PLACEHOLDER)
            } else {
                Span::raw(value.to_string())
            };
            Line::from(vec![
                Span::styled(format!("{:<9}", key), Style::default().fg(Color::DarkGray)),
                value,
            ])
        })
        .collect();
    Text::from(lines)
}

/// Provider switches, flagging enabled providers the backend has no
/// credentials for.
pub fn render_integrations(settings: Option<&IntegrationSettings>) -> Text<'static> {
    let Some(settings) = settings else {
        return Text::from(Line::styled("Integrations not loaded.", PLACEHOLDER));
    };
    let integ = &settings.integrations;
    let env = &settings.env_ready;

    let switch = |on: bool, ready: bool| -> Vec<Span<'static>> {
        let mut spans = vec![if on {
            Span::styled("on", Style::default().fg(Color::Green))
        } else {
            Span::styled("off", Style::default().fg(Color::DarkGray))
        }];
        if on && !ready {
            spans.push(Span::styled(" (no credentials)", Style::default().fg(Color::Yellow)));
        }
        spans
    };
    let label = |key: &str| Span::styled(format!("{:<9}", key), Style::default().fg(Color::DarkGray));

    let mut sms = vec![label("SMS")];
    sms.extend(switch(integ.twilio_enabled, env.twilio));
    let mut email = vec![label("Email")];
    email.extend(switch(integ.sendgrid_enabled, env.sendgrid));
    let mut auto = vec![label("Autosend")];
    auto.extend(switch(integ.autosend_enabled, true));
    auto.push(Span::raw(format!(" [{}]", integ.autosend_channels)));

    Text::from(vec![Line::from(sms), Line::from(email), Line::from(auto)])
}

/// The banner, colored by kind. A clear banner renders as an empty line.
pub fn render_banner(banner: &Banner) -> Line<'static> {
    if banner.is_clear() {
        return Line::default();
    }
    let style = match banner.kind() {
        BannerKind::Neutral => Style::default().fg(Color::White),
        BannerKind::Ok => Style::default().fg(Color::Black).bg(Color::Green),
        BannerKind::Error => Style::default().fg(Color::White).bg(Color::Red),
    };
    Line::styled(format!(" {} ", banner.text()), style)
}

/// Drops styling, one output line per text line.
pub fn to_plain(text: &Text) -> String {
    text.lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|s| s.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
