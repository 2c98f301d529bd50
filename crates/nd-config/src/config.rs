//! Supervisor configuration with env overrides, validation and versioning.

use crate::{ConfigError, ConfigErrorResult, LoggingSettings, TimeoutSettings, ToolSettings};

use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

/// Configuration version for migration support.
/// Increment when adding new fields or changing structure.
pub const CONFIG_VERSION: u32 = 1;

pub const CONFIG_FILENAME: &str = "config.toml";

const CONFIG_DIR_ENV: &str = "ND_CONFIG_DIR";
const CONFIG_DIR_NAME: &str = "netter-desk";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Config file format version
    pub version: u32,
    pub tool: ToolSettings,
    pub timeouts: TimeoutSettings,
    pub logging: LoggingSettings,
    /// Version the file was migrated from during this load, if any
    #[serde(skip)]
    pub migrated_from: Option<u32>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            tool: ToolSettings::default(),
            timeouts: TimeoutSettings::default(),
            logging: LoggingSettings::default(),
            migrated_from: None,
        }
    }
}

impl SupervisorConfig {
    /// Load config from the default config directory.
    ///
    /// Loading order:
    /// 1. ND_CONFIG_DIR env var, else `<platform config dir>/netter-desk`
    /// 2. config.toml if present, else defaults
    /// 3. ND_* / NETTER_PATH environment overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;
        Self::load_from(&config_dir)
    }

    /// Load config from an explicit directory, migrating old versions in place.
    pub fn load_from(config_dir: &Path) -> ConfigErrorResult<Self> {
        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            let mut config = Self::load_toml(&config_path)?;
            if config.version < CONFIG_VERSION {
                // Logged by log_summary(), once logging is up
                let from = config.version;
                config = Self::migrate(config);
                config.migrated_from = Some(from);
                config.save(config_dir)?;
            }
            config
        } else {
            Self::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Save config to `<config_dir>/config.toml` atomically.
    pub fn save(&self, config_dir: &Path) -> ConfigErrorResult<()> {
        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::Io {
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = toml::to_string_pretty(self)?;

        let temp_path = config_path.with_extension("toml.tmp");
        std::fs::write(&temp_path, &content).map_err(|e| ConfigError::Io {
            path: temp_path.clone(),
            source: e,
        })?;
        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        Ok(())
    }

    fn migrate(mut config: Self) -> Self {
        // Version 0 -> 1: timeouts table introduced
        if config.version == 0 {
            config.timeouts = TimeoutSettings::default();
            config.version = 1;
        }

        config
    }

    /// Get the config directory.
    /// Priority: ND_CONFIG_DIR env var > platform config dir
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Validate all configuration.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.version > CONFIG_VERSION {
            return Err(ConfigError::config(format!(
                "config version {} is newer than supported version {}",
                self.version, CONFIG_VERSION
            )));
        }

        self.tool.validate()?;
        self.timeouts.validate()?;

        if self.logging.file_prefix.trim().is_empty() {
            return Err(ConfigError::config("logging.file_prefix must not be empty"));
        }

        Ok(())
    }

    /// Absolute log directory, resolved against `config_dir` when relative.
    pub fn log_dir(&self, config_dir: &Path) -> PathBuf {
        let dir = Path::new(&self.logging.directory);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            config_dir.join(dir)
        }
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        if let Some(from) = self.migrated_from {
            info!("  migrated from version {} to {}", from, self.version);
        }
        info!(
            "  tool: {} (search dir: {})",
            self.tool.executable,
            self.tool
                .search_dir
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| "PATH".into())
        );
        info!(
            "  timeouts: start={}ms, stop={}ms, kill={}ms, restart delay={}ms, exec={}ms",
            self.timeouts.start_timeout_ms,
            self.timeouts.stop_timeout_ms,
            self.timeouts.kill_timeout_ms,
            self.timeouts.restart_delay_ms,
            self.timeouts.exec_timeout_ms
        );
        info!(
            "  probe: start={}ms, exec={}ms",
            self.timeouts.probe_start_timeout_ms, self.timeouts.probe_exec_timeout_ms
        );
        info!(
            "  logging: {} ({})",
            self.logging.level.as_str(),
            self.logging.directory
        );
    }

    fn apply_env_overrides(&mut self) {
        // Tool
        Self::apply_env_string("ND_TOOL_EXECUTABLE", &mut self.tool.executable);
        Self::apply_env_option_path("NETTER_PATH", &mut self.tool.search_dir);
        Self::apply_env_option_path("ND_TOOL_WORKING_DIR", &mut self.tool.working_dir);

        // Timeouts
        Self::apply_env_parse("ND_START_TIMEOUT_MS", &mut self.timeouts.start_timeout_ms);
        Self::apply_env_parse("ND_STOP_TIMEOUT_MS", &mut self.timeouts.stop_timeout_ms);
        Self::apply_env_parse("ND_KILL_TIMEOUT_MS", &mut self.timeouts.kill_timeout_ms);
        Self::apply_env_parse(
            "ND_RESTART_DELAY_MS",
            &mut self.timeouts.restart_delay_ms,
        );
        Self::apply_env_parse("ND_EXEC_TIMEOUT_MS", &mut self.timeouts.exec_timeout_ms);

        // Logging
        Self::apply_env_parse("ND_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_string("ND_LOG_DIR", &mut self.logging.directory);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<PathBuf> values
    fn apply_env_option_path(var_name: &str, target: &mut Option<PathBuf>) {
        if let Some(val) = std::env::var_os(var_name)
            && !val.is_empty()
        {
            *target = Some(PathBuf::from(val));
        }
    }
}
