pub mod command_bar;
pub mod connect_form;
pub mod detail_panel;
pub mod footer;
pub mod home;
pub mod item_list;
pub mod notice_panel;
pub mod result_panel;
pub mod theme;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::{App, ViewMode};

pub fn render(f: &mut Frame, app: &App) {
    let size = f.area();

    // Determine bottom bar height: command bar (3) when editing, else footer (1)
    let editing = matches!(app.view_mode, ViewMode::Input(_));
    let bottom_height = if editing { 3 } else { 1 };
    let notice_height = if app.notices.is_empty() { 0 } else { 6 };

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),
            Constraint::Length(notice_height),
            Constraint::Length(bottom_height),
        ])
        .split(size);

    let main_area = vertical[0];
    let notice_area = vertical[1];
    let bottom_area = vertical[2];

    match app.view_mode {
        ViewMode::Home => home::render(f, main_area, app),
        ViewMode::Connect => connect_form::render(f, main_area, app),
        ViewMode::Items | ViewMode::Input(_) => {
            // Candidates (45%) + details over result (55%)
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(main_area);
            let right = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(horizontal[1]);

            item_list::render(f, horizontal[0], app);
            detail_panel::render(f, right[0], app);
            result_panel::render(f, right[1], app);
        }
    }

    if !app.notices.is_empty() {
        notice_panel::render(f, notice_area, app);
    }

    if editing {
        command_bar::render(f, bottom_area, app);
    } else {
        footer::render(f, bottom_area, app);
    }
}
