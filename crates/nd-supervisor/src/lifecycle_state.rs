use std::fmt;

use serde::Serialize;

/// Current state of the supervised server process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// No process is running
    Idle,
    /// Process spawned, waiting for the readiness marker
    Starting,
    /// Readiness marker seen
    Running,
    /// Stop requested, waiting for exit
    Stopping,
    /// Process exited without a stop request
    Crashed,
}

impl LifecycleState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Crashed => "crashed",
        };
        f.write_str(name)
    }
}
