// Key explorer pane.
// Lists cache keys with human labels and selection highlighting.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::cache::CacheKey;
use crate::key::ParsedKey;

/// Format a timestamp as relative time (e.g., "2m ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// Render a centered empty-state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

/// Render the key list. Labels come from the key syntax so tagged keys
/// read the way the user wrote them, not the way the cache stores them.
pub fn render_key_list(frame: &mut Frame, app: &mut App, keys: &[CacheKey], area: Rect) {
    let items: Vec<ListItem> = keys
        .iter()
        .map(|key| {
            let parsed = ParsedKey::decode(key);
            let label_style = if parsed.is_error() {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Cyan)
            };

            let mut spans = vec![Span::styled(parsed.label(), label_style)];
            if parsed.is_error() {
                spans.push(Span::styled("  error", Style::default().fg(Color::DarkGray)));
            } else if parsed.is_multi_arg() {
                spans.push(Span::styled("  array", Style::default().fg(Color::DarkGray)));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list_widget = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Cached Keys "))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, &mut app.list_state);
}
