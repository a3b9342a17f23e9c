use ratatui::style::Color;

use crate::model::notice::NoticeLevel;
use crate::model::workflow::Workflow;

pub const JIRA_BLUE: Color = Color::Rgb(0x00, 0x52, 0xCC);

pub fn workflow_color(workflow: Workflow) -> Color {
    match workflow {
        Workflow::Estimate => Color::Rgb(0x4F, 0xC3, 0xF7),
        Workflow::Assess => Color::Rgb(0xFF, 0xB7, 0x4D),
        Workflow::Check => Color::Rgb(0x81, 0xC7, 0x84),
    }
}

pub fn notice_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Info => Color::Gray,
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
    }
}

pub fn notice_icon(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "i",
        NoticeLevel::Success => "\u{2714}",
        NoticeLevel::Warning => "!",
        NoticeLevel::Error => "\u{2718}",
    }
}

/// Colour for High/Medium/Low scores and Yes/No verdicts.
pub fn value_color(value: &str) -> Color {
    let lower = value.trim().to_ascii_lowercase();
    if lower.starts_with("high") || lower.starts_with("must") || lower.starts_with("yes") {
        Color::Green
    } else if lower.starts_with("medium") || lower.starts_with("should") {
        Color::Yellow
    } else if lower.starts_with("low") || lower.starts_with("nice") || lower.starts_with("no") {
        Color::Red
    } else {
        Color::White
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdicts_and_scores_are_coloured() {
        assert_eq!(value_color("Yes"), Color::Green);
        assert_eq!(value_color("No"), Color::Red);
        assert_eq!(value_color("Medium"), Color::Yellow);
        assert_eq!(value_color("Must-have: launch blocker"), Color::Green);
        assert_eq!(value_color("0.7"), Color::White);
    }
}
