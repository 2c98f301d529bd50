use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_EXEC_TIMEOUT_MS, DEFAULT_KILL_TIMEOUT_MS,
    DEFAULT_MAX_LINE_BYTES, DEFAULT_PROBE_EXEC_TIMEOUT_MS, DEFAULT_PROBE_START_TIMEOUT_MS,
    DEFAULT_RESTART_DELAY_MS, DEFAULT_START_TIMEOUT_MS, DEFAULT_STOP_TIMEOUT_MS,
    MIN_MAX_LINE_BYTES,
};

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSettings {
    /// Wait for OS-level "process alive" confirmation (milliseconds)
    pub start_timeout_ms: u64,
    /// Graceful stop window before escalating to kill (milliseconds)
    pub stop_timeout_ms: u64,
    /// Wait after kill before declaring the process unkillable (milliseconds)
    pub kill_timeout_ms: u64,
    /// Pause between stop and start during restart (milliseconds)
    pub restart_delay_ms: u64,
    /// Bound on one-shot command execution (milliseconds)
    pub exec_timeout_ms: u64,
    /// Availability probe start bound (milliseconds)
    pub probe_start_timeout_ms: u64,
    /// Availability probe execution bound (milliseconds)
    pub probe_exec_timeout_ms: u64,
    /// Longest partial stdout line kept while waiting for a newline
    pub max_line_bytes: usize,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            start_timeout_ms: DEFAULT_START_TIMEOUT_MS,
            stop_timeout_ms: DEFAULT_STOP_TIMEOUT_MS,
            kill_timeout_ms: DEFAULT_KILL_TIMEOUT_MS,
            restart_delay_ms: DEFAULT_RESTART_DELAY_MS,
            exec_timeout_ms: DEFAULT_EXEC_TIMEOUT_MS,
            probe_start_timeout_ms: DEFAULT_PROBE_START_TIMEOUT_MS,
            probe_exec_timeout_ms: DEFAULT_PROBE_EXEC_TIMEOUT_MS,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

impl TimeoutSettings {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let positive = [
            ("timeouts.start_timeout_ms", self.start_timeout_ms),
            ("timeouts.stop_timeout_ms", self.stop_timeout_ms),
            ("timeouts.kill_timeout_ms", self.kill_timeout_ms),
            ("timeouts.exec_timeout_ms", self.exec_timeout_ms),
            ("timeouts.probe_start_timeout_ms", self.probe_start_timeout_ms),
            ("timeouts.probe_exec_timeout_ms", self.probe_exec_timeout_ms),
        ];

        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::timeout(format!("{name} must be > 0")));
            }
        }

        if self.probe_start_timeout_ms > self.probe_exec_timeout_ms {
            return Err(ConfigError::timeout(format!(
                "timeouts.probe_start_timeout_ms ({}) must not exceed timeouts.probe_exec_timeout_ms ({})",
                self.probe_start_timeout_ms, self.probe_exec_timeout_ms
            )));
        }

        if self.max_line_bytes < MIN_MAX_LINE_BYTES {
            return Err(ConfigError::timeout(format!(
                "timeouts.max_line_bytes must be >= {}, got {}",
                MIN_MAX_LINE_BYTES, self.max_line_bytes
            )));
        }

        Ok(())
    }

    pub fn start_timeout(&self) -> Duration {
        Duration::from_millis(self.start_timeout_ms)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }

    pub fn kill_timeout(&self) -> Duration {
        Duration::from_millis(self.kill_timeout_ms)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    pub fn exec_timeout(&self) -> Duration {
        Duration::from_millis(self.exec_timeout_ms)
    }

    pub fn probe_start_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_start_timeout_ms)
    }

    pub fn probe_exec_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_exec_timeout_ms)
    }
}
