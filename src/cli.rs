use anyhow::{bail, Result};

use crate::model::workflow::Workflow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Launch the TUI, optionally straight into one page.
    Launch(Option<Workflow>),
    Help,
}

/// Parse the arguments after the program name.
///
/// Supported forms:
///   agile
///   agile estimate | assess | check
///   agile help | -h | --help
pub fn parse_args(args: &[String]) -> Result<Command> {
    match args {
        [] => Ok(Command::Launch(None)),
        [arg] => match arg.as_str() {
            "help" | "-h" | "--help" => Ok(Command::Help),
            other => match Workflow::from_arg(other) {
                Some(workflow) => Ok(Command::Launch(Some(workflow))),
                None => bail!("Unknown command: {other}\n\nRun `agile help` for usage."),
            },
        },
        _ => bail!("Too many arguments\n\nRun `agile help` for usage."),
    }
}

pub fn print_help() {
    println!("agile — AI helpers for Jira backlogs\n");
    println!("USAGE:");
    println!("  agile            Launch the dashboard home page");
    println!("  agile estimate   Open the effort estimator");
    println!("  agile assess     Open the business value assessor");
    println!("  agile check      Open the granularity checker");
    println!("  agile help       Show this help");
    println!();
    println!("CONFIG:");
    println!("  ~/.agile-assist/config.toml pre-fills the connection form.");
    println!("  OPENAI_API_KEY overrides the configured model key.");
    println!("  AGILE_LOG sets the log filter (logs go to ~/.agile-assist/logs).");
}
