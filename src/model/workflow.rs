use serde::{Deserialize, Serialize};
use std::fmt;

/// The three assistant pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Workflow {
    Estimate,
    Assess,
    Check,
}

impl Workflow {
    pub const ALL: [Workflow; 3] = [Workflow::Estimate, Workflow::Assess, Workflow::Check];

    pub fn as_str(&self) -> &'static str {
        match self {
            Workflow::Estimate => "estimate",
            Workflow::Assess => "assess",
            Workflow::Check => "check",
        }
    }

    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "estimate" | "estimator" => Some(Workflow::Estimate),
            "assess" | "value" => Some(Workflow::Assess),
            "check" | "granularity" => Some(Workflow::Check),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Workflow::Estimate => "Effort Estimator",
            Workflow::Assess => "Business Value Assessor",
            Workflow::Check => "Granularity Checker",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Workflow::Estimate => "\u{1F4CF}",
            Workflow::Assess => "\u{1F4CA}",
            Workflow::Check => "\u{1F9E9}",
        }
    }

    pub fn tagline(&self) -> &'static str {
        match self {
            Workflow::Estimate => "Suggest story point ranges and confidence scores",
            Workflow::Assess => "Score business value and suggest a priority",
            Workflow::Check => "Decide whether a story fits in a single sprint",
        }
    }

    /// Label of the key that invokes the model on this page.
    pub fn run_label(&self) -> &'static str {
        match self {
            Workflow::Estimate => "estimate",
            Workflow::Assess => "assess",
            Workflow::Check => "check",
        }
    }

    pub fn spinner_text(&self) -> &'static str {
        match self {
            Workflow::Estimate => "Fetching similar stories and estimating...",
            Workflow::Assess => "Assessing with AI...",
            Workflow::Check => "Analyzing granularity with AI...",
        }
    }

    pub fn supports_write_back(&self) -> bool {
        !matches!(self, Workflow::Check)
    }

    pub fn none_found_message(&self) -> &'static str {
        match self {
            Workflow::Estimate => "No unestimated user stories found in the selected project.",
            Workflow::Assess => "No matching stories found.",
            Workflow::Check => "No issues found in the selected project.",
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_arg_accepts_names_and_aliases() {
        for w in Workflow::ALL {
            assert_eq!(Workflow::from_arg(w.as_str()), Some(w));
        }
        assert_eq!(Workflow::from_arg("granularity"), Some(Workflow::Check));
        assert_eq!(Workflow::from_arg("refine"), None);
    }

    #[test]
    fn only_checker_lacks_write_back() {
        assert!(Workflow::Estimate.supports_write_back());
        assert!(Workflow::Assess.supports_write_back());
        assert!(!Workflow::Check.supports_write_back());
    }
}
