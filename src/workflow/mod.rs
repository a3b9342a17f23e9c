//! The controller shared by all three workflow pages.
//!
//! Every external failure is caught here and turned into a [`Notice`]; nothing
//! returned to the UI is an error.

pub mod connection;
pub mod filters;
pub mod session;

#[cfg(test)]
mod tests;

use tracing::{debug, info, warn};

use crate::config::FieldMap;
use crate::error::WorkflowError;
use crate::llm::CompletionRequest;
use crate::model::credentials::Credentials;
use crate::model::notice::Notice;
use crate::model::work_item::WorkItem;
use crate::model::workflow::Workflow;
use crate::prompt::examples::{join_examples, retrieve_examples};
use crate::prompt::parser::{parse_response, ParsedResult};
use crate::prompt::render::PromptContext;
use crate::prompt::schema::{self, fields, OutputSchema};
use crate::prompt::templates::prompt_spec;
use crate::providers::{CustomFieldSpec, FieldValue};

use connection::Connector;
use session::{Session, StoredResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Disconnected,
    NoSelection,
    ItemSelected,
    AwaitingModel,
    ResultAvailable,
}

pub struct Controller {
    pub workflow: Workflow,
    pub session: Session,
    connector: Box<dyn Connector>,
    fields: FieldMap,
    model_name: String,
    example_count: usize,
    awaiting: bool,
}

impl Controller {
    pub fn new(
        workflow: Workflow,
        connector: Box<dyn Connector>,
        fields: FieldMap,
        model_name: String,
        example_count: usize,
    ) -> Self {
        Self {
            workflow,
            session: Session::default(),
            connector,
            fields,
            model_name,
            example_count,
            awaiting: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if !self.session.is_connected() {
            Phase::Disconnected
        } else if self.session.selected_item().is_none() {
            Phase::NoSelection
        } else if self.awaiting {
            Phase::AwaitingModel
        } else if self.session.current_result().is_some() {
            Phase::ResultAvailable
        } else {
            Phase::ItemSelected
        }
    }

    pub fn current_result(&self) -> Option<&StoredResult> {
        self.session.current_result()
    }

    /// Move to another page, keeping the connection.
    pub fn switch_workflow(&mut self, workflow: Workflow) {
        if self.workflow != workflow {
            self.workflow = workflow;
            self.session.reset_page();
            self.awaiting = false;
        }
    }

    pub async fn connect(&mut self, creds: Credentials) -> Notice {
        let creds = creds.trimmed();
        if !creds.is_complete() {
            return Notice::warning("Please fill in all fields to connect.");
        }

        match self.connector.connect(&creds).await {
            Ok(connection) => {
                info!(
                    user = %connection.user,
                    project = %creds.project_key,
                    tickets = connection.tickets.name(),
                    model = connection.model.name(),
                    "Connected"
                );
                let text = format!(
                    "Connected as {} to JIRA: {}",
                    creds.email, creds.project_key
                );
                self.session.clear();
                self.session.connection = Some(connection);
                self.session.credentials = Some(creds);
                Notice::success(text)
            }
            Err(e) => {
                let err = WorkflowError::connection(e);
                warn!("{err}");
                self.session.clear();
                Notice::error(err.to_string())
            }
        }
    }

    pub fn disconnect(&mut self) -> Notice {
        self.session.clear();
        self.awaiting = false;
        info!("Disconnected");
        Notice::info("Disconnected. Credentials and results cleared.")
    }

    /// Fetch the candidate list for the current workflow.
    pub async fn load_candidates(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        if !self.session.is_connected() {
            notices.push(Notice::warning("Connect to Jira first."));
            return notices;
        }

        if self.workflow == Workflow::Assess && self.session.business_value_key.is_none() {
            match self.ensure_business_value_field().await {
                Ok(notice) => notices.push(notice),
                Err(err) => {
                    warn!("{err}");
                    notices.push(Notice::error(err.to_string()));
                    notices.push(Notice::warning(
                        "No issues found in the selected project or custom field is missing.",
                    ));
                    self.session.candidates.clear();
                    self.session.select(0);
                    return notices;
                }
            }
        }

        let (jql, limit) =
            filters::candidates(self.workflow, self.session.project_key(), &self.fields);
        let target = self.target_field_key();

        let result = match &self.session.connection {
            Some(conn) => conn.tickets.search(&jql, limit, target.as_deref()).await,
            None => Ok(Vec::new()),
        };
        match result {
            Ok(items) => {
                debug!(workflow = %self.workflow, count = items.len(), "Loaded candidates");
                self.session.candidates = items;
            }
            Err(e) => {
                let err = WorkflowError::query(e);
                warn!("{err}");
                notices.push(Notice::error(err.to_string()));
                self.session.candidates.clear();
            }
        }

        self.session.select(0);
        if self.session.visible_candidates().is_empty() {
            notices.push(Notice::warning(self.workflow.none_found_message()));
        }
        notices
    }

    pub fn select(&mut self, index: usize) {
        self.session.select(index);
    }

    pub fn toggle_only_unassessed(&mut self) -> Option<Notice> {
        if self.workflow != Workflow::Assess {
            return None;
        }
        self.session.only_unassessed = !self.session.only_unassessed;
        self.session.select(0);
        if self.session.visible_candidates().is_empty() {
            Some(Notice::warning(self.workflow.none_found_message()))
        } else {
            None
        }
    }

    /// Mark the model call as in flight. Returns false when no item is selected.
    pub fn begin_model_call(&mut self) -> bool {
        if self.session.is_connected() && self.session.selected_item().is_some() {
            self.awaiting = true;
            true
        } else {
            false
        }
    }

    /// Build the prompt for the selected item, call the model and store the parsed reply.
    pub async fn run_model(&mut self, extra_context: &str) -> Notice {
        let outcome = self.try_run_model(extra_context).await;
        self.awaiting = false;

        match outcome {
            Ok((item_id, parsed)) => {
                let blank = parsed.is_blank();
                self.session.store_result(&item_id, parsed);
                if blank {
                    Notice::warning("The model reply did not follow the requested format.")
                } else {
                    Notice::success(format!("Result ready for {item_id}."))
                }
            }
            Err(err) => {
                warn!("{err}");
                Notice::error(err.to_string())
            }
        }
    }

    async fn try_run_model(
        &self,
        extra_context: &str,
    ) -> Result<(String, ParsedResult), WorkflowError> {
        let conn = self
            .session
            .connection
            .as_ref()
            .ok_or_else(|| WorkflowError::Connection("not connected".into()))?;
        let item = self
            .session
            .selected_item()
            .ok_or_else(|| WorkflowError::Configuration("no work item selected".into()))?;
        let spec = prompt_spec(self.workflow);

        let ctx = match self.workflow {
            Workflow::Estimate => {
                let examples = retrieve_examples(
                    conn.tickets.as_ref(),
                    self.session.project_key(),
                    &self.fields,
                    item,
                    self.example_count,
                )
                .await;
                PromptContext::new()
                    .with("summary", item.title.as_str())
                    .with("description", item.description.as_str())
                    .with("component", item.component.as_str())
                    .with("examples", join_examples(&examples))
            }
            Workflow::Assess => PromptContext::new()
                .with("user_story", assess_story_text(item))
                .with("context", extra_context.trim()),
            Workflow::Check => PromptContext::new().with("user_story", check_story_text(item)),
        };
        let prompt = spec.render(ctx)?;

        info!(workflow = %self.workflow, item = %item.id, "Invoking model");
        let reply = conn
            .model
            .complete(CompletionRequest {
                prompt,
                model: self.model_name.clone(),
                temperature: spec.temperature,
                max_tokens: spec.max_tokens,
            })
            .await
            .map_err(WorkflowError::model)?;
        debug!(item = %item.id, reply = %reply, "Model reply");

        let mut parsed = parse_response(spec.schema, &reply);
        if self.workflow == Workflow::Check {
            apply_verdict_fallback(&mut parsed, &reply);
        }
        let missing: Vec<&str> = spec
            .schema
            .fields()
            .filter(|field| parsed.get(field).is_empty())
            .collect();
        if !missing.is_empty() {
            debug!(item = %item.id, ?missing, "Reply lacked sections");
        }
        Ok((item.id.clone(), parsed))
    }

    /// Persist the current result onto the selected item.
    ///
    /// `final_estimate` is the user-edited story point value (estimator only).
    /// On failure the result is kept so the write can be retried.
    pub async fn write_back(&mut self, final_estimate: &str) -> Notice {
        if !self.workflow.supports_write_back() {
            return Notice::info("This page has no write-back.");
        }
        let Some(result) = self.session.current_result() else {
            return Notice::warning("Nothing to save for the selected item.");
        };
        let item_id = result.item_id.clone();

        let (field_key, value) = match self.workflow {
            Workflow::Estimate => {
                let raw = final_estimate.trim();
                match raw.parse::<f64>() {
                    Ok(n) if n.is_finite() => {
                        (self.fields.story_points_key.clone(), FieldValue::Number(n))
                    }
                    _ => {
                        let err = WorkflowError::Write(format!(
                            "'{raw}' is not a number; enter a single numeric estimate"
                        ));
                        return Notice::error(err.to_string());
                    }
                }
            }
            _ => match &self.session.business_value_key {
                Some(key) => (
                    key.clone(),
                    FieldValue::RichText(compose_text(&schema::ASSESS, &result.parsed)),
                ),
                None => {
                    let err = WorkflowError::Configuration(format!(
                        "custom field '{}' is not available",
                        self.fields.business_value_name
                    ));
                    return Notice::error(err.to_string());
                }
            },
        };

        let display_value = match &value {
            FieldValue::Number(n) => format_number(*n),
            FieldValue::RichText(text) => text.clone(),
        };
        let outcome = match &self.session.connection {
            Some(conn) => conn
                .tickets
                .update_field(&item_id, &field_key, value)
                .await
                .map_err(WorkflowError::write),
            None => Err(WorkflowError::Connection("not connected".into())),
        };

        match outcome {
            Ok(()) => self.after_write(&item_id, display_value),
            Err(err) => {
                warn!(item = %item_id, "{err}");
                Notice::error(err.to_string())
            }
        }
    }

    fn after_write(&mut self, item_id: &str, value: String) -> Notice {
        match self.workflow {
            Workflow::Estimate => {
                // The item no longer matches the "unestimated" filter.
                self.session.candidates.retain(|i| i.id != item_id);
                self.session.clear_result();
                let selected = self.session.selected;
                self.session.select(selected);
                Notice::success(format!("Story points updated to {value} for {item_id}!"))
            }
            _ => {
                if let Some(item) = self.session.candidates.iter_mut().find(|i| i.id == item_id) {
                    item.target_value = Some(value);
                }
                Notice::success(format!("Business Value updated for {item_id} in Jira!"))
            }
        }
    }

    /// Look up the Business Value field, provisioning it when absent.
    async fn ensure_business_value_field(&mut self) -> Result<Notice, WorkflowError> {
        let conn = self
            .session
            .connection
            .as_ref()
            .ok_or_else(|| WorkflowError::Connection("not connected".into()))?;
        let name = self.fields.business_value_name.clone();

        let existing = conn
            .tickets
            .custom_field_id(&name)
            .await
            .map_err(WorkflowError::query)?;
        let (key, notice) = match existing {
            Some(key) => (key, Notice::info(format!("Custom field '{name}' found in Jira."))),
            None => {
                let spec =
                    CustomFieldSpec::textarea(&name, &self.fields.business_value_description);
                let created = match conn.tickets.create_custom_field(&spec).await {
                    Ok(created) => created,
                    Err(e) => {
                        warn!(field = %name, "Custom field creation failed: {e:#}");
                        None
                    }
                };
                match created {
                    Some(key) => (
                        key,
                        Notice::success(format!("Custom field '{name}' created in Jira.")),
                    ),
                    // Another client may have created it in the meantime.
                    None => match conn
                        .tickets
                        .custom_field_id(&name)
                        .await
                        .map_err(WorkflowError::query)?
                    {
                        Some(key) => (
                            key,
                            Notice::info(format!("Custom field '{name}' already exists in Jira.")),
                        ),
                        None => {
                            return Err(WorkflowError::Configuration(format!(
                                "Could not create or find the custom field '{name}'."
                            )))
                        }
                    },
                }
            }
        };

        info!(field = %name, key = %key, "Resolved business value field");
        self.session.business_value_key = Some(key);
        Ok(notice)
    }

    fn target_field_key(&self) -> Option<String> {
        match self.workflow {
            Workflow::Assess => self.session.business_value_key.clone(),
            Workflow::Estimate | Workflow::Check => Some(self.fields.story_points_key.clone()),
        }
    }

    /// Pre-filled value for the estimator's final estimate input.
    pub fn default_final_estimate(&self) -> String {
        self.current_result()
            .map(|r| lower_bound(r.parsed.get(fields::RANGE)))
            .unwrap_or_default()
    }
}

fn assess_story_text(item: &WorkItem) -> String {
    format!("{}\n\n{}", item.title, item.description)
        .trim()
        .to_string()
}

fn check_story_text(item: &WorkItem) -> String {
    let description = item.description.trim();
    if description.is_empty() {
        item.title.trim().to_string()
    } else {
        description.to_string()
    }
}

/// "5-8 points" -> "5". Falls back to the trimmed input when no number leads.
pub fn lower_bound(range: &str) -> String {
    let first = range
        .split(['-', '\u{2013}', '\u{2014}'])
        .next()
        .unwrap_or("")
        .trim();
    let numeric: String = first
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if numeric.is_empty() {
        first.to_string()
    } else {
        numeric
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

/// When the verdict marker is missing, take the verdict from a leading yes/no.
fn apply_verdict_fallback(parsed: &mut ParsedResult, reply: &str) {
    if !parsed.get(fields::VERDICT).is_empty() {
        return;
    }
    let trimmed = reply.trim_start();
    let Some((verdict, word)) = [("Yes", "yes"), ("No", "no")].into_iter().find(|(_, word)| {
        trimmed
            .get(..word.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(word))
            && trimmed[word.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric())
    }) else {
        return;
    };
    parsed.set(fields::VERDICT, verdict);
    if parsed.get(fields::RATIONALE).is_empty() {
        let rest = trimmed[word.len()..].trim_start_matches([',', '.', ':', '!', '-', ' ']);
        parsed.set(fields::RATIONALE, rest.trim());
    }
}

/// Re-assemble a parsed result as labelled text for a rich-text field.
pub fn compose_text(schema: &OutputSchema, parsed: &ParsedResult) -> String {
    schema
        .sections
        .iter()
        .filter_map(|section| {
            let value = parsed.get(section.field);
            if value.is_empty() {
                None
            } else {
                Some(format!("{}\n{}", section.marker, value))
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
