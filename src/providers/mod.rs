pub mod jira;

use anyhow::Result;
use async_trait::async_trait;

use crate::model::work_item::WorkItem;

/// Value written back onto an issue field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    /// Multi-line text; sent as a rich-text document where the source requires one.
    RichText(String),
}

/// Definition used when a custom field has to be provisioned.
#[derive(Debug, Clone)]
pub struct CustomFieldSpec {
    pub name: String,
    pub description: String,
    pub field_type: String,
    pub searcher_key: String,
}

impl CustomFieldSpec {
    pub fn textarea(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            field_type: "com.atlassian.jira.plugin.system.customfieldtypes:textarea".into(),
            searcher_key: "com.atlassian.jira.plugin.system.customfieldtypes:textsearcher"
                .into(),
        }
    }
}

/// An authenticated ticket-tracking service.
#[async_trait]
pub trait TicketSource: Send + Sync {
    fn name(&self) -> &str;

    /// Run a filter expression and return items in the service's order.
    /// `target_field` is read into `WorkItem::target_value` when given.
    async fn search(
        &self,
        filter: &str,
        max_results: usize,
        target_field: Option<&str>,
    ) -> Result<Vec<WorkItem>>;

    /// Unconditionally overwrite one field of one item.
    async fn update_field(&self, item_id: &str, field_key: &str, value: FieldValue)
        -> Result<()>;

    /// Look up a field key by display name.
    async fn custom_field_id(&self, _name: &str) -> Result<Option<String>> {
        Ok(None)
    }

    /// Create a custom field. Returns None if the service did not hand back a key.
    async fn create_custom_field(&self, _spec: &CustomFieldSpec) -> Result<Option<String>> {
        Ok(None)
    }
}
