use thiserror::Error;

/// Failures surfaced to the user by a workflow action.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Failed to connect to Jira: {0}")]
    Connection(String),

    #[error("Failed to load issues: {0}")]
    Query(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Failed to update Jira: {0}")]
    Write(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl WorkflowError {
    pub fn connection(err: anyhow::Error) -> Self {
        Self::Connection(format!("{err:#}"))
    }

    pub fn query(err: anyhow::Error) -> Self {
        Self::Query(format!("{err:#}"))
    }

    pub fn model(err: anyhow::Error) -> Self {
        Self::Model(format!("{err:#}"))
    }

    pub fn write(err: anyhow::Error) -> Self {
        Self::Write(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn context_chain_is_kept_in_message() {
        let err: anyhow::Result<()> =
            Err(anyhow::anyhow!("401 Unauthorized")).context("Jira authentication failed");
        let wrapped = WorkflowError::connection(err.unwrap_err());
        assert_eq!(
            wrapped.to_string(),
            "Failed to connect to Jira: Jira authentication failed: 401 Unauthorized"
        );
    }
}
