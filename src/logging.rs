use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{data_dir, LogConfig};

/// Route `tracing` output to a daily log file; the terminal is owned by the TUI.
///
/// `AGILE_LOG` takes precedence over the configured level. The returned guard
/// must be held until exit so buffered lines are flushed.
pub fn init(config: &LogConfig) -> Result<WorkerGuard> {
    let log_dir = data_dir().join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(&log_dir, "agile.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let default_level = config.level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_env("AGILE_LOG")
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(guard)
}
