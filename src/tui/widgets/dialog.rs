//! Modal dialogs drawn over the current screen

use crate::app::state::{Dialog, DialogKind, LoginField};
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, dialog: &Dialog, busy: bool, theme: &Theme, area: Rect) {
    let popup = centered(area, 60, 11);
    frame.render_widget(Clear, popup);

    let title = match dialog.kind {
        DialogKind::Login if dialog.register => "Create account",
        kind => kind.title(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.accent))
        .title(format!(" {} ", title))
        .title_style(
            Style::default()
                .fg(theme.palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .style(Style::default().bg(theme.palette.bg_primary));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let label = Style::default().fg(theme.palette.fg_secondary);
    let value = Style::default().fg(theme.palette.fg_primary);
    let focused = Style::default()
        .fg(theme.palette.accent)
        .add_modifier(Modifier::BOLD);

    let (body, hint): (Vec<Line>, &str) = match dialog.kind {
        DialogKind::Save | DialogKind::Rename => (
            vec![
                Line::from(Span::styled("Name", label)),
                Line::from(Span::styled(format!("{}▏", dialog.name), focused)),
            ],
            "Enter: save  Esc: cancel",
        ),
        DialogKind::Delete => {
            let name = dialog.target.as_ref().map(|t| t.name.as_str()).unwrap_or("");
            (
                vec![Line::from(vec![
                    Span::styled("Delete ", value),
                    Span::styled(format!("\"{}\"", name), focused),
                    Span::styled("? This cannot be undone.", value),
                ])],
                "y / Enter: delete  n / Esc: cancel",
            )
        }
        DialogKind::Login => {
            let field = |name: &str, shown: String, active: bool| {
                Line::from(vec![
                    Span::styled(format!("{:10}", name), label),
                    Span::styled(
                        if active { format!("{shown}▏") } else { shown },
                        if active { focused } else { value },
                    ),
                ])
            };
            (
                vec![
                    field(
                        "Email",
                        dialog.email.clone(),
                        dialog.field == LoginField::Email,
                    ),
                    field(
                        "Password",
                        "•".repeat(dialog.password.chars().count()),
                        dialog.field == LoginField::Password,
                    ),
                ],
                "Tab: next field  Ctrl+R: switch sign in / register  Enter: submit",
            )
        }
        DialogKind::Share => (
            vec![
                Line::from(Span::styled(
                    format!("{} Link to this palette", theme.icons.share),
                    label,
                )),
                Line::from(Span::styled(dialog.text.clone(), focused)),
            ],
            "Enter / Esc: close",
        ),
    };
    frame.render_widget(Paragraph::new(body).wrap(Wrap { trim: false }), rows[0]);

    let status = if busy && dialog.submitting {
        Line::from(Span::styled(
            format!("{} Working...", theme.icons.loading),
            Style::default().fg(theme.palette.accent_alt),
        ))
    } else if let Some(err) = &dialog.error {
        Line::from(Span::styled(
            format!("{} {}", theme.icons.error, err),
            Style::default().fg(theme.palette.error),
        ))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(status), rows[1]);
    frame.render_widget(Paragraph::new(Span::styled(hint, label)), rows[2]);
}

/// A `width` x `height` rect centered in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fits_inside() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered(area, 60, 11), Rect::new(20, 14, 60, 11));

        let tiny = Rect::new(2, 1, 30, 5);
        let r = centered(tiny, 60, 11);
        assert_eq!(r, Rect::new(2, 1, 30, 5));
    }
}
