mod app;
mod cli;
mod config;
mod error;
mod event;
mod llm;
mod logging;
mod model;
mod prompt;
mod providers;
mod ui;
mod util;
mod workflow;

use std::io;
use std::panic;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::info;

use app::{Action, App};
use cli::Command;
use workflow::connection::JiraOpenAiConnector;
use workflow::Controller;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let start = match cli::parse_args(&args) {
        Ok(Command::Launch(start)) => start,
        Ok(Command::Help) => {
            cli::print_help();
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    // Load config
    let config = config::load_config()?;

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = logging::init(&config.log)?;
    info!(start = ?start, model = %config.model.name, "Starting agile");

    let controller = Controller::new(
        start.unwrap_or(model::workflow::Workflow::Estimate),
        Box::new(JiraOpenAiConnector::new(config.model.base_url.clone())),
        config.fields.clone(),
        config.model.name.clone(),
        config.examples.count,
    );

    // Set up action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    // Create app
    let mut app = App::new(&config, controller, start, action_tx.clone());

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Spawn event reader
    let event_tx = action_tx.clone();
    tokio::spawn(async move {
        event::run_event_loop(event_tx).await;
    });

    // Main loop
    loop {
        // Render
        terminal.draw(|f| ui::render(f, &app))?;

        // Wait for action
        if let Some(action) = action_rx.recv().await {
            app.update(action).await;
            if app.should_quit {
                break;
            }
        } else {
            break;
        }
    }

    // Restore terminal
    terminal.show_cursor()?;
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    info!("Exiting");

    Ok(())
}
