use serde_json::{json, Value};

const BLOCK_NODES: &[&str] = &[
    "paragraph",
    "heading",
    "codeBlock",
    "blockquote",
    "listItem",
    "rule",
];

/// Extract plain text from Jira's Atlassian Document Format (ADF).
///
/// Block nodes end with a newline so paragraphs stay on separate lines.
pub fn extract_text_from_adf(value: &Value) -> Option<String> {
    let mut out = String::new();
    collect_text(value, &mut out);
    let text = out.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn collect_text(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Array(arr) => arr.iter().for_each(|v| collect_text(v, out)),
        Value::Object(obj) => {
            let node_type = obj.get("type").and_then(|v| v.as_str()).unwrap_or("");
            match node_type {
                "text" => {
                    if let Some(text) = obj.get("text").and_then(|v| v.as_str()) {
                        out.push_str(text);
                    }
                }
                "hardBreak" => out.push('\n'),
                _ => {
                    if node_type == "listItem" {
                        out.push_str("- ");
                    }
                    if let Some(content) = obj.get("content") {
                        collect_text(content, out);
                    }
                    if BLOCK_NODES.contains(&node_type) && !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
            }
        }
        _ => {}
    }
}

/// Build an ADF document with one paragraph per non-empty line.
pub fn text_to_adf(text: &str) -> Value {
    let paragraphs: Vec<Value> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(|line| {
            json!({
                "type": "paragraph",
                "content": [{ "type": "text", "text": line }]
            })
        })
        .collect();

    json!({
        "type": "doc",
        "version": 1,
        "content": paragraphs
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_empty_docs_yield_none() {
        assert_eq!(extract_text_from_adf(&Value::Null), None);
        assert_eq!(extract_text_from_adf(&text_to_adf("")), None);
    }

    #[test]
    fn plain_string_passes_through() {
        assert_eq!(
            extract_text_from_adf(&json!("As a user I want to log in")),
            Some("As a user I want to log in".into())
        );
    }

    #[test]
    fn paragraphs_and_lists_keep_line_structure() {
        let doc = json!({
            "type": "doc",
            "version": 1,
            "content": [
                { "type": "paragraph", "content": [
                    { "type": "text", "text": "As a user" },
                    { "type": "hardBreak" },
                    { "type": "text", "text": "I want SSO" }
                ]},
                { "type": "bulletList", "content": [
                    { "type": "listItem", "content": [
                        { "type": "paragraph", "content": [{ "type": "text", "text": "Okta" }] }
                    ]},
                    { "type": "listItem", "content": [
                        { "type": "paragraph", "content": [{ "type": "text", "text": "Azure AD" }] }
                    ]}
                ]}
            ]
        });
        assert_eq!(
            extract_text_from_adf(&doc).unwrap(),
            "As a user\nI want SSO\n- Okta\n- Azure AD"
        );
    }

    #[test]
    fn text_to_adf_round_trips_through_extraction() {
        let text = "Business Value Score: High\n\nPriority Suggestion: Must-have";
        let doc = text_to_adf(text);
        assert_eq!(doc["type"], "doc");
        assert_eq!(doc["content"].as_array().unwrap().len(), 2);
        assert_eq!(
            extract_text_from_adf(&doc).unwrap(),
            "Business Value Score: High\nPriority Suggestion: Must-have"
        );
    }
}
