use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, ViewMode};
use crate::model::workflow::Workflow;
use crate::ui::theme::notice_color;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();
    let workflow = app.workflow();

    match app.view_mode {
        ViewMode::Home => {
            spans.push(hint("↑↓", "navigate"));
            spans.push(hint("enter/1-3", "open"));
            spans.push(hint("q", "quit"));
        }
        ViewMode::Connect => {
            spans.push(hint("tab", "next field"));
            spans.push(hint("enter", "connect"));
            spans.push(hint("esc", "home"));
            spans.push(hint("ctrl+c", "quit"));
        }
        ViewMode::Items => {
            spans.push(hint("↑↓", "navigate"));
            spans.push(hint("enter", workflow.run_label()));
            match workflow {
                Workflow::Estimate => {
                    spans.push(hint("c", "final estimate"));
                    spans.push(hint("w", "save points"));
                }
                Workflow::Assess => {
                    spans.push(hint("c", "context"));
                    spans.push(hint("u", "unassessed only"));
                    spans.push(hint("w", "save value"));
                }
                Workflow::Check => {}
            }
            spans.push(hint("r", "refresh"));
            spans.push(hint("D", "disconnect"));
            spans.push(hint("esc", "home"));
            spans.push(hint("q", "quit"));
        }
        ViewMode::Input(_) => {}
    }

    if let Some(busy) = &app.busy {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(" {busy} "),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
    } else if let Some((notice, _)) = &app.flash_message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            notice.text.as_str(),
            Style::default().fg(notice_color(notice.level)),
        ));
    }

    let line = Line::from(spans);
    let paragraph = Paragraph::new(line);
    f.render_widget(paragraph, area);
}

fn hint(key: &str, desc: &str) -> Span<'static> {
    Span::styled(
        format!(" {key}:{desc} "),
        Style::default().fg(Color::DarkGray),
    )
}
