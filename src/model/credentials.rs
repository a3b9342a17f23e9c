use std::fmt;

/// Connection details collected by the connection form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub host: String,
    pub email: String,
    pub api_token: String,
    pub project_key: String,
    pub model_api_key: String,
}

impl Credentials {
    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            host: self.host.trim().to_string(),
            email: self.email.trim().to_string(),
            api_token: self.api_token.trim().to_string(),
            project_key: self.project_key.trim().to_string(),
            model_api_key: self.model_api_key.trim().to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        [
            &self.host,
            &self.email,
            &self.api_token,
            &self.project_key,
            &self.model_api_key,
        ]
        .iter()
        .all(|v| !v.trim().is_empty())
    }
}

// Tokens stay out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("project_key", &self.project_key)
            .field("model_api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials {
            host: " https://acme.atlassian.net ".into(),
            email: "dev@acme.com".into(),
            api_token: "jira-secret\n".into(),
            project_key: "ENG".into(),
            model_api_key: "sk-secret".into(),
        }
    }

    #[test]
    fn trimmed_strips_whitespace() {
        let c = creds().trimmed();
        assert_eq!(c.host, "https://acme.atlassian.net");
        assert_eq!(c.api_token, "jira-secret");
    }

    #[test]
    fn incomplete_when_any_field_blank() {
        assert!(creds().is_complete());
        let mut c = creds();
        c.model_api_key = "   ".into();
        assert!(!c.is_complete());
    }

    #[test]
    fn debug_redacts_secrets() {
        let out = format!("{:?}", creds());
        assert!(!out.contains("jira-secret"));
        assert!(!out.contains("sk-secret"));
        assert!(out.contains("dev@acme.com"));
    }
}
