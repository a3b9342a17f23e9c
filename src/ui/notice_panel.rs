use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::theme::{notice_color, notice_icon};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let visible_height = area.height.saturating_sub(2) as usize;

    // Newest at the bottom
    let skip = app.notices.len().saturating_sub(visible_height);
    let lines: Vec<Line> = app
        .notices
        .iter()
        .skip(skip)
        .map(|notice| {
            let color = notice_color(notice.level);
            Line::from(vec![
                Span::styled(
                    format!("{} ", notice.timestamp),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(format!("{} ", notice_icon(notice.level)), Style::default().fg(color)),
                Span::styled(notice.text.as_str(), Style::default().fg(color)),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta))
                .title(format!(" Notices ({}) ", app.notices.len())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
