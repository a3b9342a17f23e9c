use crate::model::credentials::Credentials;
use crate::model::work_item::WorkItem;
use crate::prompt::parser::ParsedResult;

use super::connection::Connection;

/// The most recent parsed result and the item it was computed for.
#[derive(Debug, Clone)]
pub struct StoredResult {
    pub item_id: String,
    pub parsed: ParsedResult,
    pub computed_at: String,
}

/// State of one interactive session. Nothing here outlives the process.
#[derive(Default)]
pub struct Session {
    pub credentials: Option<Credentials>,
    pub connection: Option<Connection>,
    pub candidates: Vec<WorkItem>,
    /// Index into [`Session::visible_candidates`].
    pub selected: usize,
    /// Hide items whose target field already has a value.
    pub only_unassessed: bool,
    pub business_value_key: Option<String>,
    result: Option<StoredResult>,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn project_key(&self) -> &str {
        self.credentials
            .as_ref()
            .map(|c| c.project_key.as_str())
            .unwrap_or_default()
    }

    pub fn visible_candidates(&self) -> Vec<&WorkItem> {
        self.candidates
            .iter()
            .filter(|item| !self.only_unassessed || !item.has_target_value())
            .collect()
    }

    pub fn selected_item(&self) -> Option<&WorkItem> {
        self.visible_candidates().get(self.selected).copied()
    }

    pub fn select(&mut self, index: usize) {
        let len = self.visible_candidates().len();
        self.selected = if len == 0 { 0 } else { index.min(len - 1) };
    }

    pub fn store_result(&mut self, item_id: &str, parsed: ParsedResult) {
        self.result = Some(StoredResult {
            item_id: item_id.to_string(),
            parsed,
            computed_at: chrono::Local::now().format("%H:%M:%S").to_string(),
        });
    }

    /// The stored result, only while it belongs to the selected item.
    pub fn current_result(&self) -> Option<&StoredResult> {
        let selected = self.selected_item()?;
        self.result.as_ref().filter(|r| r.item_id == selected.id)
    }

    pub fn clear_result(&mut self) {
        self.result = None;
    }

    /// Forget the candidate list and any result; keep the connection.
    pub fn reset_page(&mut self) {
        self.candidates.clear();
        self.selected = 0;
        self.only_unassessed = false;
        self.result = None;
    }

    /// Drop credentials, connection and every cached value.
    pub fn clear(&mut self) {
        *self = Session::default();
    }
}
