//! JQL filter expressions for candidate lists and example retrieval.

use crate::config::FieldMap;
use crate::model::workflow::Workflow;

pub const ESTIMATE_CANDIDATE_LIMIT: usize = 20;
pub const ASSESS_CANDIDATE_LIMIT: usize = 30;
pub const CHECK_CANDIDATE_LIMIT: usize = 20;
pub const EXAMPLE_QUERY_LIMIT: usize = 15;

/// Quote a value for use inside a JQL string literal.
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Filter and result limit for a workflow's candidate list.
pub fn candidates(workflow: Workflow, project_key: &str, fields: &FieldMap) -> (String, usize) {
    let project = quote(project_key);
    match workflow {
        Workflow::Estimate | Workflow::Check => {
            let limit = if workflow == Workflow::Estimate {
                ESTIMATE_CANDIDATE_LIMIT
            } else {
                CHECK_CANDIDATE_LIMIT
            };
            (
                format!(
                    "project={project} AND issuetype=Story AND {} is EMPTY ORDER BY created ASC",
                    quote(&fields.story_points_name)
                ),
                limit,
            )
        }
        Workflow::Assess => (
            format!("project={project} ORDER BY created ASC"),
            ASSESS_CANDIDATE_LIMIT,
        ),
    }
}

/// Estimated items in the same component, most recently updated first.
/// `None` selects items without any component.
pub fn similar_items(project_key: &str, fields: &FieldMap, component: Option<&str>) -> String {
    let component_clause = match component {
        Some(name) => format!("component={}", quote(name)),
        None => "component is EMPTY".to_string(),
    };
    format!(
        "project={} AND {} is not EMPTY AND {component_clause} ORDER BY updated DESC",
        quote(project_key),
        quote(&fields.story_points_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_candidates_require_empty_story_points() {
        let (jql, limit) = candidates(Workflow::Estimate, "ENG", &FieldMap::default());
        assert_eq!(
            jql,
            r#"project="ENG" AND issuetype=Story AND "Story Points" is EMPTY ORDER BY created ASC"#
        );
        assert_eq!(limit, 20);
    }

    #[test]
    fn assess_candidates_cover_whole_project() {
        let (jql, limit) = candidates(Workflow::Assess, "ENG", &FieldMap::default());
        assert_eq!(jql, r#"project="ENG" ORDER BY created ASC"#);
        assert_eq!(limit, 30);
    }

    #[test]
    fn similar_items_filter_by_component() {
        let fields = FieldMap::default();
        assert_eq!(
            similar_items("ENG", &fields, Some("Web \"App\"")),
            r#"project="ENG" AND "Story Points" is not EMPTY AND component="Web \"App\"" ORDER BY updated DESC"#
        );
        assert!(similar_items("ENG", &fields, None).contains("component is EMPTY"));
    }
}
