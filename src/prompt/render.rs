use crate::error::WorkflowError;

/// Named values substituted into a prompt template.
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    values: Vec<(&'static str, String)>,
}

impl PromptContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.values.push((name, value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Substitute every `{name}` in `template` with its context value.
///
/// `{{` and `}}` produce literal braces. Values are inserted verbatim and are not
/// scanned for placeholders. A placeholder without a value is a configuration error.
pub fn render(template: &str, ctx: &PromptContext) -> Result<String, WorkflowError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix("{{") {
            out.push('{');
            rest = after;
            continue;
        }
        if let Some(after) = tail.strip_prefix("}}") {
            out.push('}');
            rest = after;
            continue;
        }
        if tail.starts_with('{') {
            if let Some(close) = tail.find('}') {
                let name = &tail[1..close];
                if is_placeholder_name(name) {
                    let value = ctx.get(name).ok_or_else(|| {
                        WorkflowError::Configuration(format!(
                            "no value for prompt placeholder '{name}'"
                        ))
                    })?;
                    out.push_str(value);
                    rest = &tail[close + 1..];
                    continue;
                }
            }
        }

        out.push_str(&tail[..1]);
        rest = &tail[1..];
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_named_placeholders() {
        let ctx = PromptContext::new()
            .with("summary", "Export CSV")
            .with("component", "Reports");
        let out = render("Summary: {summary}\nComponent: {component}", &ctx).unwrap();
        assert_eq!(out, "Summary: Export CSV\nComponent: Reports");
    }

    #[test]
    fn missing_value_is_configuration_error() {
        let ctx = PromptContext::new().with("summary", "x");
        let err = render("{summary} {examples}", &ctx).unwrap_err();
        assert!(matches!(err, WorkflowError::Configuration(_)));
        assert!(err.to_string().contains("examples"));
    }

    #[test]
    fn values_are_inserted_verbatim() {
        let ctx = PromptContext::new().with("description", "uses {braces} and {{doubles}}");
        let out = render("D: {description}", &ctx).unwrap();
        assert_eq!(out, "D: uses {braces} and {{doubles}}");
    }

    #[test]
    fn escaped_and_non_identifier_braces_stay_literal() {
        let ctx = PromptContext::new().with("x", "1");
        assert_eq!(render("{{x}} = {x}", &ctx).unwrap(), "{x} = 1");
        assert_eq!(render("json: { \"a\": 1 }", &ctx).unwrap(), "json: { \"a\": 1 }");
        assert_eq!(render("dangling { and }", &ctx).unwrap(), "dangling { and }");
    }
}
