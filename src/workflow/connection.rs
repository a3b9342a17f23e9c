use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::llm::openai::OpenAiClient;
use crate::llm::LanguageModel;
use crate::model::credentials::Credentials;
use crate::providers::jira::JiraProvider;
use crate::providers::TicketSource;

/// Live adapters for one connected session.
pub struct Connection {
    pub tickets: Box<dyn TicketSource>,
    pub model: Box<dyn LanguageModel>,
    /// Display name of the authenticated ticket-source account.
    pub user: String,
}

/// Builds a [`Connection`] from form credentials, authenticating on the way.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, creds: &Credentials) -> Result<Connection>;
}

pub struct JiraOpenAiConnector {
    model_base_url: String,
}

impl JiraOpenAiConnector {
    pub fn new(model_base_url: impl Into<String>) -> Self {
        Self {
            model_base_url: model_base_url.into(),
        }
    }
}

#[async_trait]
impl Connector for JiraOpenAiConnector {
    async fn connect(&self, creds: &Credentials) -> Result<Connection> {
        let jira = JiraProvider::new(&creds.host, &creds.email, &creds.api_token);
        let user = jira.verify(&creds.project_key).await?;
        debug!(host = jira.base_url(), user = %user, "Jira credentials verified");
        let model = OpenAiClient::new(creds.model_api_key.clone(), &self.model_base_url);
        Ok(Connection {
            tickets: Box::new(jira),
            model: Box::new(model),
            user,
        })
    }
}
