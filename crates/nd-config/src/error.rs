use std::panic::Location;
use std::path::PathBuf;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum ConfigError {
    #[error("{category} error: {message} {location}")]
    Generic {
        category: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOML serialize error: {source} {location}")]
    TomlSerialize {
        #[source]
        source: toml::ser::Error,
        location: ErrorLocation,
    },

    #[error("Config directory not found")]
    NoConfigDir,
}

impl ConfigError {
    /// Create a config error
    #[track_caller]
    pub fn config<S: Into<String>>(message: S) -> Self {
        ConfigError::Generic {
            category: "Config",
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create a tool error
    #[track_caller]
    pub fn tool<S: Into<String>>(message: S) -> Self {
        ConfigError::Generic {
            category: "Tool",
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create a timeout error
    #[track_caller]
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        ConfigError::Generic {
            category: "Timeout",
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<toml::ser::Error> for ConfigError {
    #[track_caller]
    fn from(source: toml::ser::Error) -> Self {
        ConfigError::TomlSerialize {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type ConfigErrorResult<T> = StdResult<T, ConfigError>;
