//! Root layout widget - orchestrates main layout structure

use crate::app::state::{AppState, Screen, ToastKind};
use crate::input::shortcuts::Bindings;
use crate::tui::theme::{get_theme, Theme};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{dialog, help, saved, swatches};

/// Main layout structure:
/// ┌─────────────────────────────────────────────────────┐
/// │  Palette   Saved   Help                  user@local │
/// ├─────────────────────────────────────────────────────┤
/// │                  Main Content                       │
/// │          (swatches / saved list / help)             │
/// ├─────────────────────────────────────────────────────┤
/// │ status or toast                                     │
/// └─────────────────────────────────────────────────────┘
pub fn render(frame: &mut Frame, state: &mut AppState, bindings: &Bindings) {
    let theme = get_theme(state.dark_mode);
    let root = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(theme.palette.bg_primary)),
        root,
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(8),    // Content
            Constraint::Length(1), // Status / toast
        ])
        .split(root);

    render_tabs(frame, state, &theme, rows[0]);

    match state.screen {
        Screen::Palette => swatches::render(frame, state, &theme, rows[1]),
        Screen::Saved => saved::render(frame, state, &theme, rows[1]),
        Screen::Help => help::render(frame, &theme, bindings, rows[1]),
    }

    render_status(frame, state, &theme, rows[2]);

    if let Some(d) = &state.dialog {
        dialog::render(frame, d, state.busy, &theme, root);
    }
}

fn render_tabs(frame: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let icons = &theme.icons;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(" HueWave ")
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let tabs = [
        (Screen::Palette, icons.palette, "Palette"),
        (Screen::Saved, icons.saved, "Saved"),
        (Screen::Help, icons.help, "Help"),
    ];
    let mut spans = Vec::new();
    for (i, (screen, icon, label)) in tabs.iter().enumerate() {
        let style = if *screen == state.screen {
            Style::default()
                .fg(theme.palette.bg_primary)
                .bg(theme.palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.palette.fg_secondary)
        };
        spans.push(Span::styled(format!(" {} {} {} ", i + 1, icon, label), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);

    let who = match &state.user {
        Some(u) if !u.email.is_empty() => u.email.clone(),
        Some(u) => u.id.clone(),
        None => "signed out".to_string(),
    };
    let right = Line::from(Span::styled(
        format!("{} {} ", icons.user, who),
        Style::default().fg(theme.palette.fg_secondary),
    ));
    frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), inner);
}

fn render_status(frame: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let icons = &theme.icons;
    let width = area.width as usize;

    let line = match &state.toast {
        Some(toast) if !toast.is_expired() => {
            let (prefix, color) = match toast.kind {
                ToastKind::Success => (icons.success, theme.palette.success),
                ToastKind::Error => (icons.error, theme.palette.error),
            };
            Line::from(vec![
                Span::styled(format!(" {} ", prefix), Style::default().fg(color)),
                Span::styled(
                    truncate_str(&toast.message, width.saturating_sub(4)),
                    Style::default().fg(color),
                ),
            ])
        }
        _ => {
            let mut spans = vec![Span::styled(
                format!(" {}", truncate_str(&state.status, width.saturating_sub(2))),
                Style::default().fg(theme.palette.fg_secondary),
            )];
            if state.busy {
                spans.push(Span::styled(
                    format!("  {} working", icons.loading),
                    Style::default().fg(theme.palette.accent_alt),
                ));
            }
            Line::from(spans)
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}

pub(super) fn truncate_str(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    let char_count: usize = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("Vanilla Swirl", 20), "Vanilla Swirl");
        assert_eq!(truncate_str("Vanilla Swirl", 10), "Vanilla...");
        assert_eq!(truncate_str("Vanilla", 2), "Va");
        assert_eq!(truncate_str("Vanilla", 0), "");
    }
}
