use super::render::{render, PromptContext};
use super::schema::{self, OutputSchema};
use crate::error::WorkflowError;
use crate::model::workflow::Workflow;

/// Everything needed to turn a context into a model request for one workflow.
pub struct PromptSpec {
    pub template: &'static str,
    pub schema: &'static OutputSchema,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl PromptSpec {
    /// Render the template; the schema's format block fills `{output_format}`.
    pub fn render(&self, ctx: PromptContext) -> Result<String, WorkflowError> {
        let ctx = ctx.with("output_format", self.schema.format_block());
        render(self.template, &ctx)
    }
}

const ESTIMATOR_TEMPLATE: &str = r#"You are an agile estimation agent. Given a new Jira user story and several similar stories (with known story points and outcomes), suggest a draft story point estimate range (e.g., 5-8 points) and a confidence score from 0 to 1, justifying your answer.

NEW STORY:
Summary: {summary}
Description: {description}
Component: {component}

SIMILAR STORIES:
{examples}

Output (use this format):
{output_format}
"#;

const BUSINESS_VALUE_TEMPLATE: &str = r#"You are a Business Value Analyst Agent. Given a user story or backlog item, along with any context such as goals, risks, deadlines, dependencies, or effort/complexity, your tasks are:

1. Assess the business value of the item considering:
    - Business value or customer impact
    - Deadlines or time sensitivity
    - Dependencies on or by other work
    - Risk of delay or failure
    - Effort or complexity
    - Alignment with strategic goals or company objectives
    - Urgency (regulatory, competitive, or other time-sensitive factors)
    - Potential Return on Investment (ROI)
2. Suggest a **business value score** (High, Medium, Low).
3. Suggest a **priority** (Must-have/Should-have/Nice-to-have) with a brief justification.
4. If important info is missing, state what is needed.

**Input:**
User Story:
{user_story}

Context (if any):
{context}

**Output (format):**
{output_format}
"#;

const GRANULARITY_TEMPLATE: &str = r#"You are an Agile requirements analyst and user story coach.

Your job is to:
- Decide if the following user story is granular (i.e., focused, specific, and achievable within a single sprint by one team).
- If granular, answer "Yes" with a brief rationale.
- If not granular, answer "No", explain why not, and suggest how to split or rewrite the story into smaller, granular stories if possible.

User Story:
{user_story}

Output (use this format):
{output_format}
"#;

static ESTIMATE: PromptSpec = PromptSpec {
    template: ESTIMATOR_TEMPLATE,
    schema: &schema::ESTIMATE,
    temperature: 0.0,
    max_tokens: None,
};

static ASSESS: PromptSpec = PromptSpec {
    template: BUSINESS_VALUE_TEMPLATE,
    schema: &schema::ASSESS,
    temperature: 0.2,
    max_tokens: Some(1024),
};

static CHECK: PromptSpec = PromptSpec {
    template: GRANULARITY_TEMPLATE,
    schema: &schema::CHECK,
    temperature: 0.0,
    max_tokens: None,
};

pub fn prompt_spec(workflow: Workflow) -> &'static PromptSpec {
    match workflow {
        Workflow::Estimate => &ESTIMATE,
        Workflow::Assess => &ASSESS,
        Workflow::Check => &CHECK,
    }
}
