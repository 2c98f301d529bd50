use crate::{DEFAULT_LOG_DIRECTORY, DEFAULT_LOG_FILE_PREFIX, DEFAULT_LOG_LEVEL, LogLevel};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: LogLevel,
    /// Log directory (relative to the config directory unless absolute)
    pub directory: String,
    /// Prefix of the daily rolling log files
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel(DEFAULT_LOG_LEVEL),
            directory: String::from(DEFAULT_LOG_DIRECTORY),
            file_prefix: String::from(DEFAULT_LOG_FILE_PREFIX),
        }
    }
}
