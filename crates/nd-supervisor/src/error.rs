use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Failed to launch `{command}`: {message} {location}")]
    Launch {
        command: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("`{command}` did not finish within {timeout_ms}ms {location}")]
    Timeout {
        command: String,
        timeout_ms: u64,
        location: ErrorLocation,
    },

    #[error("Server exited unexpectedly with exit code {code:?} {location}")]
    Crash {
        code: Option<i32>,
        location: ErrorLocation,
    },

    #[error("Tool unavailable: {message} {location}")]
    ProbeUnavailable {
        message: String,
        location: ErrorLocation,
    },

    #[error("Command failed with exit code {code:?}: {stderr} {location}")]
    Execution {
        code: Option<i32>,
        stderr: String,
        location: ErrorLocation,
    },

    #[error("Input file does not exist: {} {location}", path.display())]
    InputMissing {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("IO error: {source} {location}")]
    Io {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },
}

impl SupervisorError {
    #[track_caller]
    pub fn launch<C: Into<String>, M: Into<String>>(command: C, message: M) -> Self {
        Self::Launch {
            command: command.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Launch error from a spawn failure, with a readable cause.
    #[track_caller]
    pub fn launch_io<C: Into<String>>(command: C, source: &std::io::Error) -> Self {
        let message = match source.kind() {
            std::io::ErrorKind::NotFound => format!("executable not found ({source})"),
            std::io::ErrorKind::PermissionDenied => {
                format!("insufficient permissions ({source})")
            }
            _ => source.to_string(),
        };
        Self::launch(command, message)
    }

    #[track_caller]
    pub fn timeout<C: Into<String>>(command: C, timeout_ms: u64) -> Self {
        Self::Timeout {
            command: command.into(),
            timeout_ms,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn crash(code: Option<i32>) -> Self {
        Self::Crash {
            code,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn probe_unavailable<M: Into<String>>(message: M) -> Self {
        Self::ProbeUnavailable {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn execution<S: Into<String>>(code: Option<i32>, stderr: S) -> Self {
        Self::Execution {
            code,
            stderr: stderr.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn input_missing<P: Into<PathBuf>>(path: P) -> Self {
        Self::InputMissing {
            path: path.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// One-line message for subscribers, without the source location.
    pub fn summary(&self) -> String {
        match self {
            Self::Launch {
                command, message, ..
            } => format!("Failed to launch `{command}`: {message}"),
            Self::Timeout {
                command,
                timeout_ms,
                ..
            } => format!("`{command}` did not finish within {timeout_ms}ms"),
            Self::Crash { code, .. } => match code {
                Some(code) => format!("Server exited unexpectedly with exit code {code}"),
                None => "Server was terminated by a signal".to_string(),
            },
            Self::ProbeUnavailable { message, .. } => format!("Tool unavailable: {message}"),
            Self::Execution { code, stderr, .. } => {
                let code = code.map_or_else(|| "none".to_string(), |c| c.to_string());
                format!("Command failed with exit code {code}: {}", stderr.trim_end())
            }
            Self::InputMissing { path, .. } => {
                format!("Input file does not exist: {}", path.display())
            }
            Self::Io { source, .. } => format!("IO error: {source}"),
        }
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::Launch { .. } | Self::ProbeUnavailable { .. } => {
                "The netter tool could not be started. \
                   Check that it is installed and on PATH, or set NETTER_PATH."
            }
            Self::Timeout { .. } => {
                "The netter tool did not respond in time. \
                   Try again or raise the timeout in config.toml."
            }
            Self::Crash { .. } => {
                "The server stopped unexpectedly. \
                   Check the output panel and the logs, then start it again."
            }
            Self::Execution { .. } => {
                "The netter tool reported an error. \
                   See its error output for details."
            }
            Self::InputMissing { .. } => {
                "The route file was not found. \
                   Save the file before starting the server."
            }
            Self::Io { .. } => "An unexpected error occurred. Please check the logs for details.",
        }
    }
}

impl From<std::io::Error> for SupervisorError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
