// Modal UI components.
// Confirmation dialog shown before destructive cache actions.

use ratatui::{prelude::*, widgets::*};

/// Draw the clear-cache confirmation on top of the current view.
pub fn draw_confirm_clear(frame: &mut Frame, key_count: usize) {
    let area = frame.area();

    let modal_width = 46;
    let modal_height = 6;
    let modal_x = (area.width.saturating_sub(modal_width)) / 2;
    let modal_y = (area.height.saturating_sub(modal_height)) / 2;

    let modal_area = Rect::new(
        modal_x,
        modal_y,
        modal_width.min(area.width),
        modal_height.min(area.height),
    );

    // Clear the area behind the modal
    frame.render_widget(Clear, modal_area);

    let entries = if key_count == 1 { "entry" } else { "entries" };
    let lines = vec![
        Line::from(""),
        Line::from(format!("Delete all {} cached {}?", key_count, entries)),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Yellow)),
            Span::styled(" = Delete  ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" = Cancel", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let dialog = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Delete Cache "),
    );

    frame.render_widget(dialog, modal_area);
}
