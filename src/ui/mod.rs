// UI module for rendering the panel.
// Two-pane layout: key explorer on the left, data explorer on the right.

mod explorer;
mod keys;
mod modal;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, NoticeLevel};

/// Main draw function that renders the entire panel.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title_bar(frame, app, chunks[0]);
    draw_content(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    // Overlays are rendered last, on top of everything.
    if app.confirm_clear {
        modal::draw_confirm_clear(frame, app.current_keys().len());
    }
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the title bar with the live key count.
fn draw_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let key_count = app.current_keys().len();
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            " cachepeek ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} cached keys", key_count),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(title, area);
}

/// Draw the main content area. The data explorer is omitted entirely
/// while the cache has no keys.
fn draw_content(frame: &mut Frame, app: &mut App, area: Rect) {
    let keys = app.current_keys();
    if keys.is_empty() {
        keys::render_empty(frame, area, "Cache is empty");
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(33), Constraint::Min(1)])
        .split(area);

    keys::render_key_list(frame, app, &keys, chunks[0]);
    explorer::render_explorer(frame, app, chunks[1]);
}

/// Draw the status bar with keybinding hints and the latest notice.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut hints = vec![
        Span::raw(" ↑↓ "),
        Span::styled("Navigate", Style::default().fg(Color::DarkGray)),
        Span::raw("  r "),
        Span::styled("Revalidate", Style::default().fg(Color::DarkGray)),
        Span::raw("  d "),
        Span::styled("Delete", Style::default().fg(Color::DarkGray)),
        Span::raw("  c "),
        Span::styled("Delete Cache", Style::default().fg(Color::DarkGray)),
        Span::raw("  ? "),
        Span::styled("Help", Style::default().fg(Color::DarkGray)),
        Span::raw("  q "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ];

    if let Some(notice) = app.latest_notice() {
        let color = match notice.level {
            NoticeLevel::Info => Color::Cyan,
            NoticeLevel::Warn => Color::Yellow,
        };
        hints.push(Span::styled(
            format!(
                "  {} ({})",
                notice.message,
                keys::format_relative_time(&notice.timestamp)
            ),
            Style::default().fg(color),
        ));
    }

    let status = Paragraph::new(Line::from(hints));
    frame.render_widget(status, area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    let popup_width = 52;
    let popup_height = 16;
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(
        popup_x,
        popup_y,
        popup_width.min(area.width),
        popup_height.min(area.height),
    );

    frame.render_widget(Clear, popup_area);

    let entries = [
        ("↑/↓ or j/k ", "Select key"),
        ("r          ", "Revalidate selected entry"),
        ("d or Del   ", "Delete selected entry"),
        ("c          ", "Delete the whole cache"),
        ("PgUp/PgDn  ", "Scroll value"),
        ("←/→ or h/l ", "Horizontal scroll"),
        ("g/G        ", "Jump to start/end of value"),
        ("?          ", "Show/hide this help"),
        ("q          ", "Quit"),
    ];

    let mut help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (binding, action) in entries {
        help_text.push(Line::from(vec![
            Span::styled(format!("  {}", binding), Style::default().fg(Color::Cyan)),
            Span::raw(action),
        ]));
    }
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(Color::DarkGray),
    )));

    let help_paragraph = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Help ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
    );

    frame.render_widget(help_paragraph, popup_area);
}
