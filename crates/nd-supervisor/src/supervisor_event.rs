use std::fmt;

use serde::Serialize;

/// Which pipe an output chunk was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl fmt::Display for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::Stderr => f.write_str("stderr"),
        }
    }
}

/// Lifecycle notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SupervisorEvent {
    /// A process is about to be spawned
    ProcessLaunched { command: String },
    /// Launch, crash or kill failure
    ProcessError { message: String },
    /// Readiness marker seen; carries the reported host:port
    ServerReady { endpoint: String },
    /// The process generation has ended
    ServerStopped,
    /// Startup-phase error output
    ServerError { message: String },
    /// Raw output as it was read
    OutputChunk { stream: OutputStream, text: String },
}

impl SupervisorEvent {
    pub fn process_error<S: Into<String>>(message: S) -> Self {
        Self::ProcessError {
            message: message.into(),
        }
    }

    pub fn server_error<S: Into<String>>(message: S) -> Self {
        Self::ServerError {
            message: message.into(),
        }
    }

    /// Event name as used on the wire and in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProcessLaunched { .. } => "process_launched",
            Self::ProcessError { .. } => "process_error",
            Self::ServerReady { .. } => "server_ready",
            Self::ServerStopped => "server_stopped",
            Self::ServerError { .. } => "server_error",
            Self::OutputChunk { .. } => "output_chunk",
        }
    }
}
