use crate::app::state::AppState;
use crate::color::Rgb;
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::root::truncate_str;

pub fn render(frame: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let icons = &theme.icons;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(format!(" {} Saved palettes ", icons.saved))
        .title_style(Style::default().fg(theme.palette.accent));
    let mut inner = block.inner(area);
    frame.render_widget(block, area);

    let list = &state.saved;
    if list.searching || !list.query.is_empty() {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(inner);
        let cursor = if list.searching { "▏" } else { "" };
        let search = Line::from(vec![
            Span::styled(" / ", Style::default().fg(theme.palette.accent_alt)),
            Span::styled(
                format!("{}{}", list.query, cursor),
                Style::default().fg(theme.palette.fg_primary),
            ),
        ]);
        frame.render_widget(Paragraph::new(search), rows[0]);
        inner = rows[1];
    }

    if list.loading && list.items.is_empty() {
        let loading = Paragraph::new(Line::from(format!("{} Loading...", icons.loading)))
            .style(Style::default().fg(theme.palette.fg_secondary));
        frame.render_widget(loading, inner);
        return;
    }
    if list.items.is_empty() {
        let msg = if state.user.is_some() {
            "No saved palettes yet. Press s on the palette screen to save one."
        } else {
            "Sign in (a) to see your saved palettes."
        };
        frame.render_widget(
            Paragraph::new(msg).style(Style::default().fg(theme.palette.fg_secondary)),
            inner,
        );
        return;
    }

    let visible = list.visible();
    if visible.is_empty() {
        frame.render_widget(
            Paragraph::new(format!("No palettes match \"{}\".", list.query.trim()))
                .style(Style::default().fg(theme.palette.fg_secondary)),
            inner,
        );
        return;
    }

    let name_width = (inner.width as usize).saturating_sub(40).max(12);
    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let is_selected = i == list.selected;
            let is_loaded = state.loaded_id == Some(p.id);
            let prefix = if is_selected {
                icons.selected
            } else {
                icons.unselected
            };
            let name_style = if is_selected {
                Style::default()
                    .fg(theme.palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.palette.fg_primary)
            };

            let mut spans = vec![
                Span::styled(format!("{} ", prefix), name_style),
                Span::styled(
                    format!("{:width$}", truncate_str(&p.name, name_width), width = name_width),
                    name_style,
                ),
                Span::raw(" "),
            ];
            for hex in &p.colors {
                if let Some(rgb) = Rgb::from_hex(hex) {
                    spans.push(Span::styled(
                        icons.swatch,
                        Style::default().fg(Color::Rgb(rgb.r, rgb.g, rgb.b)),
                    ));
                }
            }
            spans.push(Span::styled(
                format!("  {}", p.created_at.date()),
                Style::default().fg(theme.palette.fg_secondary),
            ));
            if is_loaded {
                spans.push(Span::styled(
                    format!(" {}", icons.success),
                    Style::default().fg(theme.palette.success),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut list_state = ListState::default()
        .with_selected(Some(list.selected))
        .with_offset(list.scroll_offset);

    let widget = List::new(items).highlight_style(Style::default().bg(theme.palette.bg_highlight));
    frame.render_stateful_widget(widget, inner, &mut list_state);
}
