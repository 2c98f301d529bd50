use error_location::ErrorLocation;
use nd_config::ConfigError;
use nd_supervisor::SupervisorError;
use std::panic::Location;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {source} {location}")]
    Config {
        #[source]
        source: ConfigError,
        location: ErrorLocation,
    },

    #[error("{source}")]
    Supervisor {
        #[source]
        source: SupervisorError,
    },

    #[error("Failed to set up logging in {path}: {message} {location}")]
    Logging {
        path: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Failed to write output: {source} {location}")]
    Output {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("JSON serialization error: {source} {location}")]
    Json {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl CliError {
    #[track_caller]
    pub fn logging<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::Logging {
            path: path.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Short hint printed after the error, when one applies
    pub fn recovery_hint(&self) -> Option<&'static str> {
        match self {
            Self::Supervisor { source } => Some(source.recovery_hint()),
            Self::Config { .. } => Some(
                "Check config.toml in the config directory or delete it to use defaults.",
            ),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    #[track_caller]
    fn from(source: ConfigError) -> Self {
        Self::Config {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<SupervisorError> for CliError {
    fn from(source: SupervisorError) -> Self {
        Self::Supervisor { source }
    }
}

impl From<std::io::Error> for CliError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        Self::Output {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Json {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type CliResult<T> = std::result::Result<T, CliError>;
