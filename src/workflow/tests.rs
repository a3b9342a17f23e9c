use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use super::connection::{Connection, Connector};
use super::*;
use crate::llm::LanguageModel;
use crate::model::notice::NoticeLevel;
use crate::providers::tests::{make_work_item, MockSource};

const ESTIMATE_REPLY: &str = "**Estimated Story Point Range:** 5-8\n**Confidence Score:** 0.7\n**Reasoning:** Similar to past items X and Y.\n---";

struct MockModel {
    reply: Result<String, String>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

#[async_trait]
impl LanguageModel for MockModel {
    fn name(&self) -> &str {
        "MockModel"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request);
        self.reply.clone().map_err(|e| anyhow::anyhow!(e))
    }
}

/// Hands out one prepared connection, or fails like a bad login.
struct MockConnector {
    connection: Mutex<Option<Connection>>,
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, _creds: &Credentials) -> Result<Connection> {
        self.connection
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| anyhow::anyhow!("401 Unauthorized"))
    }
}

struct Harness {
    controller: Controller,
    queries: Arc<Mutex<Vec<String>>>,
    updates: Arc<Mutex<Vec<(String, String, FieldValue)>>>,
    creates: Arc<Mutex<Vec<String>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

fn credentials() -> Credentials {
    Credentials {
        host: "https://acme.atlassian.net".into(),
        email: "dev@acme.com".into(),
        api_token: "token".into(),
        project_key: "ENG".into(),
        model_api_key: "sk-test".into(),
    }
}

fn harness(workflow: Workflow, source: MockSource, reply: Result<&str, &str>) -> Harness {
    let queries = source.queries.clone();
    let updates = source.updates.clone();
    let creates = source.creates.clone();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let model = MockModel {
        reply: reply.map(String::from).map_err(String::from),
        requests: requests.clone(),
    };
    let connector = MockConnector {
        connection: Mutex::new(Some(Connection {
            tickets: Box::new(source),
            model: Box::new(model),
            user: "Dev".into(),
        })),
    };
    Harness {
        controller: Controller::new(
            workflow,
            Box::new(connector),
            FieldMap::default(),
            "gpt-4o".into(),
            5,
        ),
        queries,
        updates,
        creates,
        requests,
    }
}

async fn connected(workflow: Workflow, source: MockSource, reply: Result<&str, &str>) -> Harness {
    let mut h = harness(workflow, source, reply);
    let notice = h.controller.connect(credentials()).await;
    assert_eq!(notice.level, NoticeLevel::Success, "{notice}");
    h
}

#[tokio::test]
async fn starts_disconnected_and_rejects_incomplete_form() {
    let mut h = harness(Workflow::Estimate, MockSource::default(), Ok(""));
    assert_eq!(h.controller.phase(), Phase::Disconnected);

    let mut creds = credentials();
    creds.project_key = "  ".into();
    let notice = h.controller.connect(creds).await;
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert_eq!(notice.text, "Please fill in all fields to connect.");
    assert_eq!(h.controller.phase(), Phase::Disconnected);
}

#[tokio::test]
async fn failed_authentication_stays_disconnected() {
    let mut h = harness(Workflow::Estimate, MockSource::default(), Ok(""));
    h.controller.connect(credentials()).await;
    h.controller.disconnect();

    // The connector's single connection is used up, so this attempt fails.
    let notice = h.controller.connect(credentials()).await;
    assert!(notice.is_error());
    assert!(notice.text.starts_with("Failed to connect to Jira"));
    assert_eq!(h.controller.phase(), Phase::Disconnected);
}

#[tokio::test]
async fn connect_trims_credentials() {
    let mut h = harness(Workflow::Estimate, MockSource::default(), Ok(""));
    let mut creds = credentials();
    creds.project_key = " ENG ".into();
    let notice = h.controller.connect(creds).await;
    assert_eq!(notice.text, "Connected as dev@acme.com to JIRA: ENG");
    assert_eq!(h.controller.session.project_key(), "ENG");
}

#[tokio::test]
async fn estimate_round_trip_parses_and_stores_result() {
    let source = MockSource::with_candidates(vec![make_work_item("ENG-1", Some("Web"), None)])
        .with_examples(vec![
            make_work_item("ENG-1", Some("Web"), Some("3")),
            make_work_item("ENG-9", Some("Web"), Some("5")),
        ]);
    let mut h = connected(Workflow::Estimate, source, Ok(ESTIMATE_REPLY)).await;

    let notices = h.controller.load_candidates().await;
    assert!(notices.is_empty());
    assert_eq!(h.controller.phase(), Phase::ItemSelected);

    assert!(h.controller.begin_model_call());
    assert_eq!(h.controller.phase(), Phase::AwaitingModel);
    let notice = h.controller.run_model("").await;
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(h.controller.phase(), Phase::ResultAvailable);

    let result = h.controller.current_result().unwrap();
    assert_eq!(result.item_id, "ENG-1");
    assert_eq!(result.parsed.get(fields::RANGE), "5-8");
    assert_eq!(result.parsed.get(fields::CONFIDENCE), "0.7");
    assert_eq!(result.parsed.get(fields::REASONING), "Similar to past items X and Y.");
    assert_eq!(h.controller.default_final_estimate(), "5");

    let requests = h.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].temperature, 0.0);
    assert_eq!(requests[0].model, "gpt-4o");
    let prompt = &requests[0].prompt;
    assert!(prompt.contains("Summary: Test item ENG-1"));
    assert!(prompt.contains("Component: Web"));
    // The item under estimation never appears among its own examples.
    assert!(prompt.contains("- Summary: Test item ENG-9"));
    assert!(!prompt.contains("- Summary: Test item ENG-1"));

    let queries = h.queries.lock().unwrap();
    assert!(queries[1].contains(r#"component="Web""#));
}

#[tokio::test]
async fn example_lookup_failure_still_renders_prompt() {
    let mut source = MockSource::with_candidates(vec![make_work_item("ENG-1", None, None)]);
    source.fail_examples = true;
    let mut h = connected(Workflow::Estimate, source, Ok(ESTIMATE_REPLY)).await;
    h.controller.load_candidates().await;
    h.controller.begin_model_call();
    let notice = h.controller.run_model("").await;
    assert_eq!(notice.level, NoticeLevel::Success);

    let requests = h.requests.lock().unwrap();
    assert!(requests[0]
        .prompt
        .contains("SIMILAR STORIES:\n[No similar stories found]"));
    assert!(h.queries.lock().unwrap()[1].contains("component is EMPTY"));
}

#[tokio::test]
async fn unformatted_reply_yields_empty_fields_without_error() {
    let source = MockSource::with_candidates(vec![make_work_item("ENG-1", None, None)]);
    let mut h = connected(
        Workflow::Estimate,
        source,
        Ok("This looks like a medium story to me."),
    )
    .await;
    h.controller.load_candidates().await;
    h.controller.begin_model_call();
    let notice = h.controller.run_model("").await;
    assert_eq!(notice.level, NoticeLevel::Warning);

    let result = h.controller.current_result().unwrap();
    assert_eq!(result.parsed.get(fields::RANGE), "");
    assert_eq!(result.parsed.get(fields::CONFIDENCE), "");
    assert_eq!(result.parsed.get(fields::REASONING), "");
}

#[tokio::test]
async fn model_failure_stores_nothing() {
    let source = MockSource::with_candidates(vec![make_work_item("ENG-1", None, None)]);
    let mut h = connected(Workflow::Estimate, source, Err("quota exceeded")).await;
    h.controller.load_candidates().await;
    h.controller.begin_model_call();
    let notice = h.controller.run_model("").await;
    assert!(notice.is_error());
    assert!(notice.text.contains("quota exceeded"));
    assert!(h.controller.current_result().is_none());
    assert_eq!(h.controller.phase(), Phase::ItemSelected);
}

#[tokio::test]
async fn search_failure_reports_and_shows_none_found() {
    let source = MockSource::default().failing_search();
    let mut h = connected(Workflow::Estimate, source, Ok("")).await;
    let notices = h.controller.load_candidates().await;

    assert_eq!(notices.len(), 2);
    assert!(notices[0].text.starts_with("Failed to load issues"));
    assert_eq!(
        notices[1].text,
        "No unestimated user stories found in the selected project."
    );
    assert!(h.controller.session.candidates.is_empty());
    assert_eq!(h.controller.phase(), Phase::NoSelection);
    assert!(!h.controller.begin_model_call());
}

#[tokio::test]
async fn switching_items_hides_result_until_reselected() {
    let source = MockSource::with_candidates(vec![
        make_work_item("ENG-1", None, None),
        make_work_item("ENG-2", None, None),
    ]);
    let mut h = connected(Workflow::Estimate, source, Ok(ESTIMATE_REPLY)).await;
    h.controller.load_candidates().await;
    h.controller.begin_model_call();
    h.controller.run_model("").await;

    h.controller.select(1);
    assert!(h.controller.current_result().is_none());
    assert_eq!(h.controller.phase(), Phase::ItemSelected);
    let notice = h.controller.write_back("5").await;
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert!(h.updates.lock().unwrap().is_empty());

    h.controller.select(0);
    assert_eq!(h.controller.current_result().unwrap().item_id, "ENG-1");
}

#[tokio::test]
async fn non_numeric_estimate_is_rejected_and_result_kept() {
    let source = MockSource::with_candidates(vec![make_work_item("ENG-1", None, None)]);
    let mut h = connected(Workflow::Estimate, source, Ok(ESTIMATE_REPLY)).await;
    h.controller.load_candidates().await;
    h.controller.begin_model_call();
    h.controller.run_model("").await;

    let notice = h.controller.write_back("five").await;
    assert!(notice.is_error());
    assert!(notice.text.starts_with("Failed to update Jira"));
    assert_eq!(
        h.controller.current_result().unwrap().parsed.get(fields::RANGE),
        "5-8"
    );

    let notice = h.controller.write_back("5").await;
    assert_eq!(notice.text, "Story points updated to 5 for ENG-1!");
    let updates = h.updates.lock().unwrap();
    assert_eq!(
        updates.as_slice(),
        &[(
            "ENG-1".to_string(),
            "customfield_10016".to_string(),
            FieldValue::Number(5.0)
        )]
    );
    // Estimated items leave the unestimated list.
    assert!(h.controller.session.candidates.is_empty());
}

#[tokio::test]
async fn rejected_write_keeps_result_for_retry() {
    let source = MockSource::with_candidates(vec![make_work_item("ENG-1", None, None)])
        .failing_update();
    let mut h = connected(Workflow::Estimate, source, Ok(ESTIMATE_REPLY)).await;
    h.controller.load_candidates().await;
    h.controller.begin_model_call();
    h.controller.run_model("").await;

    let notice = h.controller.write_back("5").await;
    assert!(notice.is_error());
    assert!(notice.text.contains("must be a number"));
    assert_eq!(h.controller.phase(), Phase::ResultAvailable);
}

#[tokio::test]
async fn disconnect_clears_everything() {
    let source = MockSource::with_candidates(vec![make_work_item("ENG-1", None, None)]);
    let mut h = connected(Workflow::Estimate, source, Ok(ESTIMATE_REPLY)).await;
    h.controller.load_candidates().await;
    h.controller.begin_model_call();
    h.controller.run_model("").await;

    h.controller.disconnect();
    assert_eq!(h.controller.phase(), Phase::Disconnected);
    assert!(h.controller.session.credentials.is_none());
    assert!(h.controller.current_result().is_none());
    assert!(h.controller.session.candidates.is_empty());
}

const ASSESS_REPLY: &str = "---\n**Business Value Assessment:**\n- Customer impact: high\n\n**Business Value Score:** High\n\n**Priority Suggestion:** Must-have\nJustification: Needed for launch.\n\n**Missing Information:** None\n---";

#[tokio::test]
async fn assess_finds_existing_field_and_filters_unassessed() {
    let source = MockSource::with_candidates(vec![
        make_work_item("ENG-1", None, Some("Score: High")),
        make_work_item("ENG-2", None, None),
    ])
    .with_known_field("Business Value", "customfield_10100");
    let mut h = connected(Workflow::Assess, source, Ok(ASSESS_REPLY)).await;

    let notices = h.controller.load_candidates().await;
    assert_eq!(notices[0].text, "Custom field 'Business Value' found in Jira.");
    assert_eq!(
        h.controller.session.business_value_key.as_deref(),
        Some("customfield_10100")
    );
    assert!(h.creates.lock().unwrap().is_empty());
    assert_eq!(h.controller.session.visible_candidates().len(), 2);

    assert!(h.controller.toggle_only_unassessed().is_none());
    let visible = h.controller.session.visible_candidates();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, "ENG-2");
}

#[tokio::test]
async fn assess_sends_context_and_writes_composed_text() {
    let source = MockSource::with_candidates(vec![make_work_item("ENG-2", None, None)])
        .with_known_field("Business Value", "customfield_10100");
    let mut h = connected(Workflow::Assess, source, Ok(ASSESS_REPLY)).await;
    h.controller.load_candidates().await;

    h.controller.begin_model_call();
    h.controller.run_model("  Launch is in March  ").await;
    {
        let requests = h.requests.lock().unwrap();
        assert_eq!(requests[0].temperature, 0.2);
        assert_eq!(requests[0].max_tokens, Some(1024));
        assert!(requests[0]
            .prompt
            .contains("User Story:\nTest item ENG-2\n\nDescription of ENG-2"));
        assert!(requests[0]
            .prompt
            .contains("Context (if any):\nLaunch is in March\n"));
    }
    let result = h.controller.current_result().unwrap();
    assert_eq!(result.parsed.get(fields::SCORE), "High");

    let notice = h.controller.write_back("").await;
    assert_eq!(notice.text, "Business Value updated for ENG-2 in Jira!");
    let updates = h.updates.lock().unwrap();
    let (item, key, value) = &updates[0];
    assert_eq!(item, "ENG-2");
    assert_eq!(key, "customfield_10100");
    match value {
        FieldValue::RichText(text) => {
            assert!(text.starts_with("Business Value Assessment:\n- Customer impact: high"));
            assert!(text.contains("Business Value Score:\nHigh"));
            assert!(text.contains("Priority Suggestion:\nMust-have\nJustification: Needed for launch."));
        }
        other => panic!("unexpected value {other:?}"),
    }
    // The assessor keeps its result and marks the item as assessed.
    assert!(h.controller.current_result().is_some());
    assert!(h.controller.session.candidates[0].has_target_value());
}

#[tokio::test]
async fn assess_provisions_missing_field() {
    let mut source = MockSource::with_candidates(vec![make_work_item("ENG-1", None, None)]);
    source.create_returns = Some("customfield_10200".into());
    let mut h = connected(Workflow::Assess, source, Ok(ASSESS_REPLY)).await;

    let notices = h.controller.load_candidates().await;
    assert_eq!(notices[0].text, "Custom field 'Business Value' created in Jira.");
    assert_eq!(h.creates.lock().unwrap().as_slice(), &["Business Value"]);
    assert_eq!(
        h.controller.session.business_value_key.as_deref(),
        Some("customfield_10200")
    );
}

#[tokio::test]
async fn assess_picks_up_field_created_elsewhere() {
    let mut source = MockSource::with_candidates(vec![make_work_item("ENG-1", None, None)]);
    source.created_elsewhere = Some("customfield_10300".into());
    let mut h = connected(Workflow::Assess, source, Ok(ASSESS_REPLY)).await;

    let notices = h.controller.load_candidates().await;
    assert_eq!(
        notices[0].text,
        "Custom field 'Business Value' already exists in Jira."
    );
    assert_eq!(
        h.controller.session.business_value_key.as_deref(),
        Some("customfield_10300")
    );
}

#[tokio::test]
async fn assess_without_field_shows_no_candidates() {
    let source = MockSource::with_candidates(vec![make_work_item("ENG-1", None, None)]);
    let mut h = connected(Workflow::Assess, source, Ok(ASSESS_REPLY)).await;

    let notices = h.controller.load_candidates().await;
    assert!(notices[0].is_error());
    assert!(notices[0]
        .text
        .contains("Could not create or find the custom field 'Business Value'."));
    assert!(h.controller.session.candidates.is_empty());
    // No search ran without a target field.
    assert!(h.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn check_uses_description_and_has_no_write_back() {
    let source = MockSource::with_candidates(vec![make_work_item("ENG-4", None, None)]);
    let mut h = connected(
        Workflow::Check,
        source,
        Ok("**Granular:** Yes\n**Rationale:** Single screen change."),
    )
    .await;
    h.controller.load_candidates().await;
    h.controller.begin_model_call();
    h.controller.run_model("").await;

    assert!(h.requests.lock().unwrap()[0]
        .prompt
        .contains("User Story:\nDescription of ENG-4\n"));
    let result = h.controller.current_result().unwrap();
    assert_eq!(result.parsed.get(fields::VERDICT), "Yes");
    assert_eq!(result.parsed.get(fields::RATIONALE), "Single screen change.");

    let notice = h.controller.write_back("").await;
    assert_eq!(notice.level, NoticeLevel::Info);
    assert!(h.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn check_falls_back_to_leading_verdict_word() {
    let source = MockSource::with_candidates(vec![make_work_item("ENG-4", None, None)]);
    let mut h = connected(
        Workflow::Check,
        source,
        Ok("No. It mixes reporting and billing; split it in two."),
    )
    .await;
    h.controller.load_candidates().await;
    h.controller.begin_model_call();
    h.controller.run_model("").await;

    let result = h.controller.current_result().unwrap();
    assert_eq!(result.parsed.get(fields::VERDICT), "No");
    assert_eq!(
        result.parsed.get(fields::RATIONALE),
        "It mixes reporting and billing; split it in two."
    );
}

#[tokio::test]
async fn switching_workflow_keeps_connection_and_drops_page_state() {
    let source = MockSource::with_candidates(vec![make_work_item("ENG-1", None, None)]);
    let mut h = connected(Workflow::Estimate, source, Ok(ESTIMATE_REPLY)).await;
    h.controller.load_candidates().await;
    h.controller.begin_model_call();
    h.controller.run_model("").await;

    h.controller.switch_workflow(Workflow::Check);
    assert!(h.controller.session.is_connected());
    assert!(h.controller.session.candidates.is_empty());
    assert_eq!(h.controller.phase(), Phase::NoSelection);
}

#[test]
fn lower_bound_of_ranges() {
    assert_eq!(lower_bound("5-8"), "5");
    assert_eq!(lower_bound("5 – 8 points"), "5");
    assert_eq!(lower_bound("13"), "13");
    assert_eq!(lower_bound("0.5-1"), "0.5");
    assert_eq!(lower_bound("about eight"), "about eight");
    assert_eq!(lower_bound(""), "");
}

#[test]
fn compose_text_skips_empty_sections() {
    let mut parsed = ParsedResult::default();
    parsed.set(fields::SCORE, "Low");
    assert_eq!(
        compose_text(&schema::ASSESS, &parsed),
        "Business Value Score:\nLow"
    );
}
