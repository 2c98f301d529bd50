mod config;
mod error;
mod log_level;
mod logging_settings;
mod timeout_settings;
mod tool_settings;

#[cfg(test)]
mod tests;

pub use config::{CONFIG_FILENAME, CONFIG_VERSION, SupervisorConfig};
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_settings::LoggingSettings;
pub use timeout_settings::TimeoutSettings;
pub use tool_settings::ToolSettings;

const DEFAULT_EXECUTABLE: &str = "netter";
const DEFAULT_START_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_STOP_TIMEOUT_MS: u64 = 3_000;
const DEFAULT_KILL_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_RESTART_DELAY_MS: u64 = 500;
const DEFAULT_EXEC_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_PROBE_START_TIMEOUT_MS: u64 = 3_000;
const DEFAULT_PROBE_EXEC_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_MAX_LINE_BYTES: usize = 64 * 1024;
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "logs";
const DEFAULT_LOG_FILE_PREFIX: &str = "nd";

const MIN_MAX_LINE_BYTES: usize = 256;
