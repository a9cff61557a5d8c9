//! Palette screen: swatches side by side with contrast-aware labels

use crate::app::state::AppState;
use crate::color::{self, naming};
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    render_swatches(frame, state, theme, rows[0]);
    render_info(frame, state, theme, rows[1]);
}

fn render_swatches(frame: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let colors = state.palette.colors();
    if colors.is_empty() {
        return;
    }
    let constraints: Vec<Constraint> = colors
        .iter()
        .map(|_| Constraint::Ratio(1, colors.len() as u32))
        .collect();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (i, (c, col)) in colors.iter().zip(cols.iter()).enumerate() {
        let rgb = c.rgb();
        let bg = Color::Rgb(rgb.r, rgb.g, rgb.b);
        let fg = if color::use_white_text(&c.hex, state.contrast_threshold) {
            Color::Rgb(255, 255, 255)
        } else {
            Color::Rgb(0, 0, 0)
        };
        let selected = i == state.selected;
        let editing = state.editor.as_ref().filter(|e| e.index == i);

        let mut block = Block::default().style(Style::default().bg(bg));
        if selected {
            block = block
                .borders(Borders::ALL)
                .border_set(theme.border_set())
                .border_style(Style::default().fg(fg).add_modifier(Modifier::BOLD));
        }
        let inner = block.inner(*col);
        frame.render_widget(block, *col);

        let label = match editing {
            Some(e) => format!("{} {}▏", theme.icons.edit, e.buffer),
            None => c.hex.clone(),
        };
        let lock = if c.locked {
            theme.icons.lock
        } else {
            theme.icons.unlock
        };
        let lock_style = if c.locked {
            Style::default().fg(fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg).add_modifier(Modifier::DIM)
        };

        let mut lines = Vec::new();
        let top = inner.height.saturating_sub(3) / 2;
        lines.extend(std::iter::repeat_n(Line::default(), top as usize));
        lines.push(Line::from(Span::styled(
            label,
            Style::default().fg(fg).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(lock, lock_style)));

        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .style(Style::default().bg(bg)),
            inner,
        );
    }
}

fn render_info(frame: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let icons = &theme.icons;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let name = naming::generate_palette_name(&state.palette.hexes());
    let loaded = state
        .loaded_id
        .and_then(|id| state.saved.items.iter().find(|p| p.id == id))
        .map(|p| format!("  ({})", p.name))
        .unwrap_or_default();

    let dim = Style::default().fg(theme.palette.fg_secondary);
    let history_style = |enabled: bool| {
        if enabled {
            Style::default().fg(theme.palette.accent_alt)
        } else {
            dim
        }
    };
    let locked = state.palette.colors().iter().filter(|c| c.locked).count();

    let line = Line::from(vec![
        Span::styled(
            format!(" {}", name),
            Style::default()
                .fg(theme.palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(loaded, dim),
        Span::raw("   "),
        Span::styled(
            format!("{} {}", icons.undo, state.palette.undo_depth()),
            history_style(state.palette.can_undo()),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} {}", icons.redo, state.palette.redo_depth()),
            history_style(state.palette.can_redo()),
        ),
        Span::raw("  "),
        Span::styled(format!("{} {}", icons.lock, locked), dim),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}
