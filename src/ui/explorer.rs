// Data explorer pane.
// Shows the selected entry's pretty-printed JSON value with scrolling.

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::key::ParsedKey;

/// Render the explorer pane for the current selection.
pub fn render_explorer(frame: &mut Frame, app: &App, area: Rect) {
    let Some(selected) = app.selected.clone() else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Data Explorer ");
        let text = Paragraph::new("Select a key to inspect its value")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(area);

    draw_header(frame, &selected, chunks[0]);
    draw_value(frame, app, chunks[1]);
}

/// Draw the explorer header: key label, classification badges, and the
/// action hints that apply to the selected entry.
fn draw_header(frame: &mut Frame, key: &str, area: Rect) {
    let parsed = ParsedKey::decode(key);

    let mut spans = vec![
        Span::styled(
            " Data Explorer ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("`{}`", parsed.label()), Style::default().fg(Color::Magenta)),
    ];
    if parsed.is_error() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            " error ",
            Style::default().bg(Color::Red).fg(Color::White),
        ));
    }
    if parsed.is_multi_arg() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            " array ",
            Style::default().bg(Color::White).fg(Color::Black),
        ));
    }
    spans.push(Span::styled(
        "   r Revalidate  d Delete",
        Style::default().fg(Color::DarkGray),
    ));

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, area);
}

/// Draw the scrollable JSON view with a line-window indicator.
fn draw_value(frame: &mut Frame, app: &App, area: Rect) {
    let text = app
        .selected_value_pretty()
        .unwrap_or_else(|| String::from("null"));
    let line_count = text.lines().count();
    let scroll_y = app.value_scroll_y as usize;
    let visible = area.height.saturating_sub(2) as usize;

    let title = format!(
        " Value [{}-{}/{}] ",
        scroll_y + 1,
        (scroll_y + visible).min(line_count),
        line_count
    );

    let block = Block::default().borders(Borders::ALL).title(title);
    let paragraph = Paragraph::new(text)
        .block(block)
        .scroll((app.value_scroll_y, app.value_scroll_x));
    frame.render_widget(paragraph, area);
}
