use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::model::workflow::Workflow;
use crate::ui::theme::workflow_color;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Agile AI Assistant",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "AI-driven helpers for estimation, business value and story refinement.",
            Style::default().fg(Color::Gray),
        )),
        Line::raw(""),
    ];

    for (i, workflow) in Workflow::ALL.iter().enumerate() {
        let selected = i == app.home_selected;
        let marker = if selected { "\u{25B6} " } else { "  " };
        let name_style = if selected {
            Style::default()
                .fg(workflow_color(*workflow))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(workflow_color(*workflow))
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{} ", i + 1), Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{} ", workflow.emoji())),
            Span::styled(workflow.display_name(), name_style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("      {}", workflow.tagline()),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::raw(""));
    }

    if let Some(creds) = &app.controller.session.credentials {
        lines.push(Line::from(Span::styled(
            format!("Connected to {} as {}", creds.project_key, creds.email),
            Style::default().fg(Color::Green),
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Home "),
    );
    f.render_widget(paragraph, area);
}
