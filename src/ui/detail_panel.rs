use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::model::workflow::Workflow;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Details ");

    let Some(item) = app.controller.session.selected_item() else {
        f.render_widget(block, area);
        return;
    };

    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        item.label(),
        Style::default().fg(Color::White),
    ))];

    if let Some(status) = &item.status {
        lines.push(Line::from(vec![
            Span::styled("Status: ", Style::default().fg(Color::Gray)),
            Span::raw(status),
        ]));
    }

    lines.push(Line::from(vec![
        Span::styled("Component: ", Style::default().fg(Color::Gray)),
        Span::raw(&item.component),
    ]));

    if let Some(value) = &item.target_value {
        let label = match app.workflow() {
            Workflow::Assess => "Business Value: ",
            Workflow::Estimate | Workflow::Check => "Story Points: ",
        };
        let first_line = value.lines().next().unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(label, Style::default().fg(Color::Gray)),
            Span::raw(first_line),
        ]));
    }

    if let Some(updated) = &item.updated {
        lines.push(Line::from(vec![
            Span::styled("Updated: ", Style::default().fg(Color::Gray)),
            Span::raw(updated.format("%Y-%m-%d %H:%M").to_string()),
        ]));
    }

    if let Some(url) = &item.url {
        lines.push(Line::from(vec![
            Span::styled("URL: ", Style::default().fg(Color::Gray)),
            Span::styled(url, Style::default().fg(Color::Blue)),
        ]));
    }

    lines.push(Line::raw(""));
    if item.description.trim().is_empty() {
        lines.push(Line::from(Span::styled(
            "No description.",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        let truncated: String = item.description.chars().take(600).collect();
        lines.extend(truncated.lines().map(|l| Line::raw(l.to_string())));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}
