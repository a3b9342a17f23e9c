use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, ViewMode};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let ViewMode::Input(target) = app.view_mode else {
        return;
    };

    let input = &app.input_buffer;
    let width = area.width.saturating_sub(2) as usize;
    let len = input.chars().count();

    // Keep the tail of long input visible
    let shown: String = input.chars().skip(len.saturating_sub(width.saturating_sub(1))).collect();
    let cursor = shown.chars().count() as u16;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(target.title());

    let paragraph = Paragraph::new(Line::from(Span::raw(shown))).block(block);
    f.render_widget(paragraph, area);

    // Position cursor
    let x = area.x + 1 + cursor;
    let y = area.y + 1;
    f.set_cursor_position((x.min(area.x + area.width.saturating_sub(2)), y));
}
