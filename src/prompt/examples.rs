use tracing::{debug, warn};

use crate::config::FieldMap;
use crate::model::work_item::WorkItem;
use crate::providers::TicketSource;
use crate::workflow::filters::{self, EXAMPLE_QUERY_LIMIT};

/// Rendered in place of the examples when none were found.
pub const NO_EXAMPLES: &str = "[No similar stories found]";

/// Up to `n` formatted blocks describing estimated items similar to `item`.
///
/// Query failures are logged and treated as "no examples"; the prompt must
/// render without any.
pub async fn retrieve_examples(
    source: &dyn TicketSource,
    project_key: &str,
    fields: &FieldMap,
    item: &WorkItem,
    n: usize,
) -> Vec<String> {
    let component = item.has_component().then_some(item.component.as_str());
    let jql = filters::similar_items(project_key, fields, component);

    let found = match source
        .search(&jql, EXAMPLE_QUERY_LIMIT, Some(&fields.story_points_key))
        .await
    {
        Ok(found) => found,
        Err(e) => {
            warn!(item = %item.id, "Example lookup failed: {e:#}");
            return Vec::new();
        }
    };

    let examples: Vec<String> = found
        .iter()
        .filter(|candidate| candidate.id != item.id)
        .take(n)
        .map(|candidate| format_example(candidate, &item.component))
        .collect();
    debug!(item = %item.id, count = examples.len(), "Retrieved similar stories");
    examples
}

pub fn format_example(example: &WorkItem, component: &str) -> String {
    let description = if example.description.trim().is_empty() {
        "[No Description]".to_string()
    } else {
        example.description.clone()
    };
    format!(
        "- Summary: {}\n  Description: {}\n  Component: {}\n  Story Points: {}",
        example.title,
        description,
        component,
        example.target_value.as_deref().unwrap_or("N/A")
    )
}

pub fn join_examples(examples: &[String]) -> String {
    if examples.is_empty() {
        NO_EXAMPLES.to_string()
    } else {
        examples.join("\n")
    }
}
