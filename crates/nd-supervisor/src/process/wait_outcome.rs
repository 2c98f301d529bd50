use std::process::ExitStatus;

/// Result of a bounded wait on a child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Exited(ExitStatus),
    StillAlive,
}

impl WaitOutcome {
    pub fn has_exited(&self) -> bool {
        matches!(self, Self::Exited(_))
    }

    /// Exit code, when the process exited normally.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Exited(status) => status.code(),
            Self::StillAlive => None,
        }
    }
}
