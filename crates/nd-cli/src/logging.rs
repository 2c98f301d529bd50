//! Logging setup with file rotation.

use crate::{CliError, CliResult};

use std::path::{Path, PathBuf};

use nd_config::LoggingSettings;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

const MAX_LOG_FILES: usize = 7;

/// Setup logging with stderr and rotating file output.
///
/// # Log Layers
/// - Console: human-readable, on stderr so event output stays clean
/// - File: plain text, daily rotation, 7 files kept
///
/// `RUST_LOG` overrides the configured level.
pub fn setup_logging(logs_dir: &Path, settings: &LoggingSettings) -> CliResult<()> {
    std::fs::create_dir_all(logs_dir)
        .map_err(|e| CliError::logging(logs_dir.display().to_string(), e.to_string()))?;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(&settings.file_prefix)
        .filename_suffix("log")
        .build(logs_dir)
        .map_err(|e| CliError::logging(logs_dir.display().to_string(), e.to_string()))?;

    let file_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_writer(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(settings)));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::logging(logs_dir.display().to_string(), e.to_string()))?;

    Ok(())
}

/// Filter used when `RUST_LOG` is unset.
pub fn default_directives(settings: &LoggingSettings) -> String {
    format!(
        "warn,nd={level},nd_supervisor={level},nd_config={level}",
        level = settings.level.as_str()
    )
}

/// Get path to the current log file (for bug reports).
pub fn current_log_path(logs_dir: &Path, settings: &LoggingSettings) -> PathBuf {
    let today = chrono::Local::now().format("%Y-%m-%d");
    logs_dir.join(format!("{}.{}.log", settings.file_prefix, today))
}
