use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::app::App;
use crate::model::workflow::Workflow;
use crate::ui::theme::{workflow_color, JIRA_BLUE};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let session = &app.controller.session;
    let workflow = app.workflow();

    let items: Vec<ListItem> = session
        .visible_candidates()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let selected = i == session.selected;

            // Assessed items carry a check mark.
            let marker = if workflow == Workflow::Assess && item.has_target_value() {
                Span::styled("\u{2714} ", Style::default().fg(Color::Green))
            } else {
                Span::raw("  ")
            };

            let id_span = Span::styled(format!("{} ", item.id), Style::default().fg(JIRA_BLUE));

            // Truncate title to fit
            let max_title = area.width.saturating_sub(14) as usize;
            let title: String = item.title.chars().take(max_title).collect();
            let title_style = if selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                marker,
                id_span,
                Span::styled(title, title_style),
            ]))
        })
        .collect();

    let count = items.len();
    let filter_note = if workflow == Workflow::Assess && session.only_unassessed {
        ", unassessed only"
    } else {
        ""
    };
    let title = format!(
        " {} {} ({count}{filter_note}) ",
        workflow.emoji(),
        workflow.display_name()
    );

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(workflow_color(workflow)))
            .title(title),
    );

    f.render_widget(list, area);
}
