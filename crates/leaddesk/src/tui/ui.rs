//! TUI rendering using ratatui.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::app::App;
use super::render;

/// Draw the TUI.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(8),    // Panes
            Constraint::Length(1), // Banner
            Constraint::Length(3), // Input
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_panes(frame, app, chunks[1]);
    draw_banner(frame, app, chunks[2]);
    draw_input(frame, app, chunks[3]);
    draw_footer(frame, app, chunks[4]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.snapshot.state;
    let mut spans = vec![Span::styled(
        " LeadDesk ",
        Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::raw(" "));
    spans.extend(render::render_active_meta(state.active_lead()).spans);
    spans.push(Span::raw("  |  "));
    spans.extend(render::render_usage(state.usage()).spans);
    spans.push(Span::raw("  |  "));
    spans.extend(render::render_automation(state.auto_send_enabled()).spans);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_panes(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(11)])
        .split(columns[1]);

    draw_leads(frame, app, columns[0]);
    draw_thread(frame, app, right[0]);
    draw_profile(frame, app, right[1]);
}

fn draw_leads(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.snapshot.state;
    let title = format!(" Leads ({}) ", state.leads().len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    let text = render::render_lead_list(state.leads(), state.active_lead_id());
    // keep the active row in view
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = state
        .active_index()
        .map(|i| i.saturating_sub(visible.saturating_sub(1)))
        .unwrap_or(0);

    let list = Paragraph::new(text)
        .block(block)
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(list, area);
}

fn draw_thread(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    if app.show_help {
        let help = Paragraph::new(App::help_text())
            .block(block.title(" Help (Esc to close) "))
            .wrap(Wrap { trim: false });
        frame.render_widget(help, area);
        return;
    }

    let text = render::render_thread(app.snapshot.state.thread().messages());
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);
    let bottom = render::thread_scroll(&text, inner_width, inner_height);
    let offset = app.scroll_offset.min(bottom);

    let title = if offset > 0 {
        format!(" Conversation [scroll: {}] ", offset)
    } else {
        " Conversation ".to_string()
    };

    let thread = Paragraph::new(text)
        .block(block.title(title))
        .wrap(Wrap { trim: false })
        .scroll((bottom - offset, 0));
    frame.render_widget(thread, area);
}

fn draw_profile(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.snapshot.state;
    let mut text = render::render_profile(state.profile());
    text.lines.extend(render::render_integrations(state.integrations()).lines);
    let profile = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Profile "));
    frame.render_widget(profile, area);
}

fn draw_banner(frame: &mut Frame, app: &App, area: Rect) {
    let line = match &app.notice {
        Some(notice) => Line::styled(notice.clone(), Style::default().fg(Color::Yellow)),
        None if app.snapshot.busy && app.snapshot.banner.is_clear() => {
            Line::styled("Working...", Style::default().fg(Color::DarkGray))
        }
        None => render::render_banner(&app.snapshot.banner),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(prompt) = app.confirm_prompt() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));
        let line = Line::from(vec![
            Span::styled(prompt.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  [y/N]"),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), area);
        return;
    }

    let sending = app.is_sending();
    let (title, style) = if sending {
        (" Sending... ", Style::default().fg(Color::DarkGray))
    } else {
        (" Message ", Style::default())
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    // scroll horizontally so the cursor stays visible
    let inner_width = area.width.saturating_sub(2) as usize;
    let skip = (app.cursor_pos + 1).saturating_sub(inner_width);
    let visible: String = app.input.chars().skip(skip).collect();

    frame.render_widget(Paragraph::new(visible).style(style).block(block), area);

    if !sending {
        let x = area.x + 1 + (app.cursor_pos - skip).min(u16::MAX as usize) as u16;
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let keys = if app.confirm_prompt().is_some() {
        "y: confirm | n/Esc: cancel"
    } else {
        "↑/↓: lead | Ctrl+P/N: history | PgUp/PgDn: scroll | Tab: complete | /help | Ctrl+C: quit"
    };
    let footer = Paragraph::new(format!(" {} ", keys))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(footer, area);
}
