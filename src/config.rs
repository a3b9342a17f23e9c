use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MODEL_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EXAMPLE_COUNT: usize = 5;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub jira: JiraConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub fields: FieldMap,
    #[serde(default)]
    pub examples: ExamplesConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Values used to pre-fill the connection form.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct JiraConfig {
    pub host: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
    pub project_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub name: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            name: default_model(),
            base_url: default_base_url(),
        }
    }
}

/// Maps the logical fields the workflows read and write to Jira field keys and names.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FieldMap {
    /// Field key used for reads and write-back, e.g. `customfield_10016`.
    pub story_points_key: String,
    /// Field name used inside JQL, e.g. `"Story Points" is EMPTY`.
    pub story_points_name: String,
    /// Name of the textarea custom field holding business value assessments.
    pub business_value_name: String,
    pub business_value_description: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            story_points_key: "customfield_10016".into(),
            story_points_name: "Story Points".into(),
            business_value_name: "Business Value".into(),
            business_value_description: "Business Value assessment generated by AI.".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExamplesConfig {
    pub count: usize,
}

impl Default for ExamplesConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_EXAMPLE_COUNT,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LogConfig {
    pub level: Option<String>,
}

fn default_model() -> String {
    DEFAULT_MODEL.into()
}

fn default_base_url() -> String {
    DEFAULT_MODEL_BASE_URL.into()
}

pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".agile-assist")
}

fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}

pub fn load_config() -> Result<AppConfig> {
    let mut config = load_config_from(&config_path())?;
    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        if !key.trim().is_empty() {
            config.model.api_key = Some(key);
        }
    }
    Ok(config)
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig =
        toml::from_str(&contents).with_context(|| "Failed to parse config.toml")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.model.name, DEFAULT_MODEL);
        assert_eq!(config.fields.story_points_key, "customfield_10016");
        assert_eq!(config.examples.count, DEFAULT_EXAMPLE_COUNT);
        assert!(config.jira.host.is_none());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[jira]
host = "https://acme.atlassian.net"
project_key = "ENG"

[fields]
story_points_key = "customfield_10028"

[model]
name = "gpt-4o-mini"
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.jira.host.as_deref(), Some("https://acme.atlassian.net"));
        assert_eq!(config.jira.project_key.as_deref(), Some("ENG"));
        assert_eq!(config.fields.story_points_key, "customfield_10028");
        assert_eq!(config.fields.story_points_name, "Story Points");
        assert_eq!(config.model.name, "gpt-4o-mini");
        assert_eq!(config.model.base_url, DEFAULT_MODEL_BASE_URL);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[jira\nhost = ").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config.toml"));
    }
}
