use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Component label used when an issue has no component assigned.
pub const DEFAULT_COMPONENT: &str = "General";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub component: String,
    /// Text rendering of the workflow's target field, `None` when the field is unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<FixedOffset>>,
}

impl WorkItem {
    pub fn has_target_value(&self) -> bool {
        self.target_value
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty())
    }

    pub fn has_component(&self) -> bool {
        self.component != DEFAULT_COMPONENT
    }

    /// `KEY: summary`, the label shown in candidate lists.
    pub fn label(&self) -> String {
        format!("{}: {}", self.id, self.title)
    }
}
