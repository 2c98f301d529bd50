use crate::{ConfigError, ConfigErrorResult, DEFAULT_EXECUTABLE};

use std::ffi::OsString;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where and how to find the managed server tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Executable name or path
    pub executable: String,
    /// Extra directory searched before PATH (NETTER_PATH)
    pub search_dir: Option<PathBuf>,
    /// Working directory of spawned processes (inherits ours when unset)
    pub working_dir: Option<PathBuf>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            executable: String::from(DEFAULT_EXECUTABLE),
            search_dir: None,
            working_dir: None,
        }
    }
}

impl ToolSettings {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.executable.trim().is_empty() {
            return Err(ConfigError::tool("tool.executable must not be empty"));
        }

        if let Some(ref dir) = self.search_dir
            && !dir.is_dir()
        {
            return Err(ConfigError::tool(format!(
                "tool.search_dir is not a directory: {}",
                dir.display()
            )));
        }

        if let Some(ref dir) = self.working_dir
            && !dir.is_dir()
        {
            return Err(ConfigError::tool(format!(
                "tool.working_dir is not a directory: {}",
                dir.display()
            )));
        }

        Ok(())
    }

    /// Resolve the program to launch.
    ///
    /// A bare executable name found inside `search_dir` is returned as the
    /// full path there; anything else is returned unchanged for PATH lookup.
    pub fn program(&self) -> PathBuf {
        let executable = PathBuf::from(&self.executable);
        if executable.components().count() > 1 {
            return executable;
        }

        if let Some(ref dir) = self.search_dir {
            let candidate = dir.join(&executable);
            if candidate.is_file() {
                return candidate;
            }
            #[cfg(windows)]
            {
                let candidate = candidate.with_extension("exe");
                if candidate.is_file() {
                    return candidate;
                }
            }
        }

        executable
    }

    /// PATH for spawned processes with `search_dir` prepended, if set.
    pub fn child_path(&self) -> Option<OsString> {
        let dir = self.search_dir.as_ref()?;
        let mut paths = vec![dir.clone()];
        if let Some(current) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&current));
        }
        std::env::join_paths(paths).ok()
    }
}
