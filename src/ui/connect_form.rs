use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, FormField};
use crate::ui::theme::workflow_color;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let workflow = app.workflow();
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} {}", workflow.emoji(), workflow.display_name()),
            Style::default()
                .fg(workflow_color(workflow))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Connect to Jira and the model API.",
            Style::default().fg(Color::Gray),
        )),
        Line::raw(""),
    ];

    let mut cursor = None;
    for field in FormField::ALL.iter() {
        let focused = *field == app.form.focused();
        let value = app.form.value(*field);
        let shown = if field.is_secret() {
            "\u{2022}".repeat(value.chars().count())
        } else {
            value.to_string()
        };

        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let label = format!("{:<18}", field.label());
        if focused {
            // Inside the border: x + 1, plus the label column.
            let x = area.x + 1 + label.chars().count() as u16 + shown.chars().count() as u16;
            let y = area.y + 1 + lines.len() as u16;
            cursor = Some((x.min(area.x + area.width.saturating_sub(2)), y));
        }
        lines.push(Line::from(vec![
            Span::styled(label, label_style),
            Span::raw(shown),
        ]));
    }

    if app.busy.is_some() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "Connecting...",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Connect "),
    );
    f.render_widget(paragraph, area);

    if let Some(position) = cursor {
        if app.busy.is_none() {
            f.set_cursor_position(position);
        }
    }
}
