//! Help screen showing keybindings

use crate::input::shortcuts::Bindings;
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the help screen. Global shortcuts come from the active platform bindings.
pub fn render(frame: &mut Frame, theme: &Theme, bindings: &Bindings, area: Rect) {
    let icons = &theme.icons;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(format!(" {} Keybinds ", icons.help))
        .title_style(Style::default().fg(theme.palette.accent));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let left_content = vec![
        section_header("Palette", theme),
        keybind(&bindings.generate.to_string(), "Generate new colors", theme),
        keybind(&bindings.undo.to_string(), "Undo", theme),
        keybind(&bindings.redo.to_string(), "Redo", theme),
        keybind("h / Left", "Previous swatch", theme),
        keybind("l / Right", "Next swatch", theme),
        keybind("L / x", "Lock / unlock swatch", theme),
        keybind("Enter / e", "Edit hex value", theme),
        Line::default(),
        section_header("Hex editor", theme),
        keybind("Enter", "Apply (if valid)", theme),
        keybind("Esc", "Discard edit", theme),
        Line::default(),
        section_header("Palette actions", theme),
        keybind("s", "Save palette", theme),
        keybind("r", "Update loaded palette", theme),
        keybind("y", "Share link", theme),
    ];

    let left_para = Paragraph::new(left_content).wrap(Wrap { trim: false });
    frame.render_widget(left_para, cols[0]);

    let right_content = vec![
        section_header("Saved", theme),
        keybind("j / Down", "Move down", theme),
        keybind("k / Up", "Move up", theme),
        keybind("Enter", "Load palette", theme),
        keybind("d", "Delete palette", theme),
        keybind("R", "Refresh list", theme),
        keybind("/", "Filter by name (Esc clears)", theme),
        Line::default(),
        section_header("Account", theme),
        keybind("a", "Sign in", theme),
        keybind("Ctrl+R", "Sign in / register (in dialog)", theme),
        keybind("O", "Sign out", theme),
        Line::default(),
        section_header("General", theme),
        keybind("Tab / 1-3", "Switch screen", theme),
        keybind("t", "Toggle dark / light", theme),
        keybind("q", "Quit application", theme),
    ];

    let right_para = Paragraph::new(right_content).wrap(Wrap { trim: false });
    frame.render_widget(right_para, cols[1]);
}

fn section_header(title: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![Span::styled(
        format!("━━ {} ━━", title),
        Style::default()
            .fg(theme.palette.accent)
            .add_modifier(Modifier::BOLD),
    )])
}

fn keybind(key: &str, desc: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled("  ", Style::default()),
        Span::styled(
            format!("{:14}", key),
            Style::default()
                .fg(theme.palette.accent_alt)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc.to_string(), Style::default().fg(theme.palette.fg_primary)),
    ])
}
