use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::model::workflow::Workflow;
use crate::prompt::schema::fields;
use crate::prompt::templates::prompt_spec;
use crate::ui::theme::{value_color, workflow_color};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let workflow = app.workflow();
    let result = app.controller.current_result();
    let mut lines: Vec<Line> = Vec::new();

    if workflow == Workflow::Assess {
        let context = if app.context_input.trim().is_empty() {
            Span::styled("(none, press c to add)", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(app.context_input.as_str())
        };
        lines.push(Line::from(vec![
            Span::styled("Context: ", Style::default().fg(Color::Gray)),
            context,
        ]));
        lines.push(Line::raw(""));
    }

    if let Some(busy) = &app.busy {
        lines.push(Line::from(Span::styled(
            format!("\u{23F3} {busy}"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    } else if let Some(result) = result {
        for section in prompt_spec(workflow).schema.sections {
            let value = result.parsed.get(section.field);
            let shown = if value.is_empty() { "-" } else { value };
            let colored = matches!(section.field, fields::SCORE | fields::VERDICT);

            lines.push(Line::from(Span::styled(
                section.marker,
                Style::default()
                    .fg(workflow_color(workflow))
                    .add_modifier(Modifier::BOLD),
            )));
            for text_line in shown.lines() {
                let style = if colored {
                    Style::default().fg(value_color(text_line))
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(format!("  {text_line}"), style)));
            }
            lines.push(Line::raw(""));
        }

        if workflow == Workflow::Estimate {
            lines.push(Line::from(vec![
                Span::styled("Final estimate: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    app.estimate_input.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    "  (c to edit, w to save)",
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
    } else if app.controller.session.selected_item().is_some() {
        lines.push(Line::from(Span::styled(
            format!("Press enter to {}.", workflow.run_label()),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = match result {
        Some(r) => format!(" Result for {} ({}) ", r.item_id, r.computed_at),
        None => " Result ".to_string(),
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(workflow_color(workflow)))
                .title(title),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
