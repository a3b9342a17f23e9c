use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{CustomFieldSpec, FieldValue, TicketSource};
use crate::model::work_item::{WorkItem, DEFAULT_COMPONENT};
use crate::util::adf::{extract_text_from_adf, text_to_adf};

const BASE_FIELDS: &str = "summary,description,components,status,updated";

pub struct JiraProvider {
    base_url: String,
    auth_header: String,
    client: reqwest::Client,
}

impl JiraProvider {
    pub fn new(host: &str, email: &str, api_token: &str) -> Self {
        let creds = format!("{email}:{api_token}");
        let encoded = base64::engine::general_purpose::STANDARD.encode(creds);
        Self {
            base_url: normalize_host(host),
            auth_header: format!("Basic {encoded}"),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check the credentials and the project key. Returns the account's display name.
    pub async fn verify(&self, project_key: &str) -> Result<String> {
        let myself: Myself = self
            .get_json(&format!("{}/rest/api/3/myself", self.base_url))
            .await
            .context("Jira authentication failed")?;

        let project_url = format!(
            "{}/rest/api/3/project/{}",
            self.base_url,
            urlencoding::encode(project_key)
        );
        let _: Value = self
            .get_json(&project_url)
            .await
            .with_context(|| format!("Jira project '{project_key}' is not accessible"))?;

        info!(project = project_key, "Connected to Jira at {}", self.base_url);
        Ok(myself.display_name.unwrap_or(myself.email_address.unwrap_or_default()))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self
            .client
            .get(url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Jira API request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("Jira returned {status}: {}", jira_error_message(&body));
        }
        resp.json().await.context("Failed to parse Jira response")
    }

    fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base_url, key)
    }
}

/// Accept `acme.atlassian.net`, `https://acme.atlassian.net/` and the like.
fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

/// Pull the human-readable messages out of a Jira error body.
fn jira_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default, rename = "errorMessages")]
        error_messages: Vec<String>,
        #[serde(default)]
        errors: HashMap<String, String>,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => {
            let mut parts = parsed.error_messages;
            let mut field_errors: Vec<_> = parsed.errors.into_iter().collect();
            field_errors.sort();
            parts.extend(field_errors.into_iter().map(|(k, v)| format!("{k}: {v}")));
            if parts.is_empty() {
                body.trim().to_string()
            } else {
                parts.join("; ")
            }
        }
        Err(_) => body.trim().chars().take(300).collect(),
    }
}

#[derive(Deserialize)]
struct Myself {
    #[serde(rename = "displayName")]
    display_name: Option<String>,
    #[serde(rename = "emailAddress")]
    email_address: Option<String>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<JiraIssue>,
}

#[derive(Deserialize)]
struct JiraIssue {
    key: String,
    fields: IssueFields,
}

#[derive(Deserialize)]
struct IssueFields {
    summary: Option<String>,
    description: Option<Value>,
    #[serde(default)]
    components: Vec<NamedField>,
    status: Option<NamedField>,
    updated: Option<String>,
    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct NamedField {
    name: String,
}

#[derive(Deserialize)]
struct FieldInfo {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct CreatedField {
    id: Option<String>,
}

/// Render an arbitrary Jira field value as display text.
fn field_value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Some(i.to_string()),
            (None, Some(f)) if f.fract() == 0.0 => Some(format!("{f:.0}")),
            (None, Some(f)) => Some(f.to_string()),
            _ => None,
        },
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(obj) if obj.get("type").and_then(|t| t.as_str()) == Some("doc") => {
            extract_text_from_adf(value)
        }
        Value::Object(obj) => obj
            .get("value")
            .or_else(|| obj.get("name"))
            .and_then(field_value_text),
        Value::Array(arr) => {
            let parts: Vec<String> = arr.iter().filter_map(field_value_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
    }
}

fn parse_updated(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}

impl JiraProvider {
    fn to_work_item(&self, issue: JiraIssue, target_field: Option<&str>) -> WorkItem {
        let fields = issue.fields;
        let description = fields
            .description
            .as_ref()
            .and_then(extract_text_from_adf)
            .unwrap_or_default();
        let component = fields
            .components
            .into_iter()
            .next()
            .map(|c| c.name)
            .unwrap_or_else(|| DEFAULT_COMPONENT.to_string());
        let target_value = target_field
            .and_then(|key| fields.extra.get(key))
            .and_then(field_value_text);

        WorkItem {
            url: Some(self.browse_url(&issue.key)),
            id: issue.key,
            title: fields.summary.unwrap_or_default(),
            description,
            component,
            target_value,
            status: fields.status.map(|s| s.name),
            updated: fields.updated.as_deref().and_then(parse_updated),
        }
    }
}

#[async_trait]
impl TicketSource for JiraProvider {
    fn name(&self) -> &str {
        "Jira"
    }

    async fn search(
        &self,
        filter: &str,
        max_results: usize,
        target_field: Option<&str>,
    ) -> Result<Vec<WorkItem>> {
        let fields = match target_field {
            Some(key) => format!("{BASE_FIELDS},{key}"),
            None => BASE_FIELDS.to_string(),
        };
        let url = format!(
            "{}/rest/api/3/search/jql?jql={}&maxResults={}&fields={}",
            self.base_url,
            urlencoding::encode(filter),
            max_results,
            urlencoding::encode(&fields)
        );
        debug!(jql = filter, max_results, "Searching Jira");

        let search: SearchResponse = self.get_json(&url).await?;
        let items: Vec<WorkItem> = search
            .issues
            .into_iter()
            .map(|issue| self.to_work_item(issue, target_field))
            .collect();

        debug!(count = items.len(), "Jira search returned");
        Ok(items)
    }

    async fn update_field(
        &self,
        item_id: &str,
        field_key: &str,
        value: FieldValue,
    ) -> Result<()> {
        let json_value = match value {
            FieldValue::Number(n) => serde_json::json!(n),
            FieldValue::RichText(text) => text_to_adf(&text),
        };
        let body = serde_json::json!({ "fields": { field_key: json_value } });
        let url = format!(
            "{}/rest/api/3/issue/{}",
            self.base_url,
            urlencoding::encode(item_id)
        );

        let resp = self
            .client
            .put(&url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .context("Jira API request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!(
                "Jira rejected update of {field_key} on {item_id} ({status}): {}",
                jira_error_message(&text)
            );
        }
        info!(item = item_id, field = field_key, "Updated Jira field");
        Ok(())
    }

    async fn custom_field_id(&self, name: &str) -> Result<Option<String>> {
        let fields: Vec<FieldInfo> = self
            .get_json(&format!("{}/rest/api/3/field", self.base_url))
            .await
            .context("Failed to list Jira fields")?;
        Ok(fields.into_iter().find(|f| f.name == name).map(|f| f.id))
    }

    async fn create_custom_field(&self, spec: &CustomFieldSpec) -> Result<Option<String>> {
        let body = serde_json::json!({
            "name": spec.name,
            "description": spec.description,
            "type": spec.field_type,
            "searcherKey": spec.searcher_key,
        });
        let resp = self
            .client
            .post(format!("{}/rest/api/3/field", self.base_url))
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .context("Jira API request failed")?;

        let status = resp.status();
        if status == reqwest::StatusCode::CREATED {
            let created: CreatedField = resp
                .json()
                .await
                .context("Failed to parse Jira response")?;
            return Ok(created.id);
        }

        let text = resp.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::BAD_REQUEST
            && text.contains("A custom field with this name already exists")
        {
            debug!(field = %spec.name, "Custom field already exists");
        } else {
            warn!(field = %spec.name, %status, "Custom field creation failed: {}", jira_error_message(&text));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_host_adds_scheme_and_strips_slash() {
        assert_eq!(normalize_host("acme.atlassian.net"), "https://acme.atlassian.net");
        assert_eq!(
            normalize_host(" https://acme.atlassian.net/ "),
            "https://acme.atlassian.net"
        );
        assert_eq!(normalize_host("http://localhost:8080"), "http://localhost:8080");
    }

    #[test]
    fn auth_header_is_basic_base64() {
        let p = JiraProvider::new("acme.atlassian.net", "a@b.c", "tok");
        assert_eq!(p.auth_header, "Basic YUBiLmM6dG9r");
        assert_eq!(p.base_url(), "https://acme.atlassian.net");
    }

    #[test]
    fn field_values_render_as_text() {
        assert_eq!(field_value_text(&json!(null)), None);
        assert_eq!(field_value_text(&json!(5)), Some("5".into()));
        assert_eq!(field_value_text(&json!(5.0)), Some("5".into()));
        assert_eq!(field_value_text(&json!(2.5)), Some("2.5".into()));
        assert_eq!(field_value_text(&json!("")), None);
        assert_eq!(field_value_text(&json!({"value": "High"})), Some("High".into()));
        assert_eq!(
            field_value_text(&text_to_adf("Score: High")),
            Some("Score: High".into())
        );
    }

    #[test]
    fn issue_maps_to_work_item() {
        let raw = json!({
            "issues": [{
                "key": "ENG-7",
                "fields": {
                    "summary": "Export CSV",
                    "description": text_to_adf("As an admin\nI want CSV export"),
                    "components": [{ "name": "Reports" }, { "name": "Web" }],
                    "status": { "name": "To Do" },
                    "updated": "2024-03-01T10:15:30.000+0000",
                    "customfield_10016": 3.0
                }
            }, {
                "key": "ENG-8",
                "fields": { "summary": "No frills", "description": null, "components": [] }
            }]
        });
        let parsed: SearchResponse = serde_json::from_value(raw).unwrap();
        let p = JiraProvider::new("acme.atlassian.net", "a@b.c", "tok");
        let items: Vec<WorkItem> = parsed
            .issues
            .into_iter()
            .map(|i| p.to_work_item(i, Some("customfield_10016")))
            .collect();

        assert_eq!(items[0].id, "ENG-7");
        assert_eq!(items[0].description, "As an admin\nI want CSV export");
        assert_eq!(items[0].component, "Reports");
        assert_eq!(items[0].target_value.as_deref(), Some("3"));
        assert_eq!(items[0].status.as_deref(), Some("To Do"));
        assert!(items[0].updated.is_some());
        assert_eq!(
            items[0].url.as_deref(),
            Some("https://acme.atlassian.net/browse/ENG-7")
        );

        assert_eq!(items[1].description, "");
        assert_eq!(items[1].component, DEFAULT_COMPONENT);
        assert_eq!(items[1].target_value, None);
    }

    #[test]
    fn error_messages_are_extracted() {
        let body = r#"{"errorMessages":[],"errors":{"customfield_10016":"Operation value must be a number."}}"#;
        assert_eq!(
            jira_error_message(body),
            "customfield_10016: Operation value must be a number."
        );
        assert_eq!(
            jira_error_message(r#"{"errorMessages":["Issue does not exist"]}"#),
            "Issue does not exist"
        );
        assert_eq!(jira_error_message("Bad Gateway"), "Bad Gateway");
    }
}
