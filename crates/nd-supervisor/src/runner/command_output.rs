use crate::{SupervisorError, SupervisorResult};

use serde::Serialize;

/// Captured result of a one-shot tool run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// None when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Stdout on exit code 0, otherwise [`SupervisorError::Execution`]
    /// carrying stderr.
    #[track_caller]
    pub fn into_success(self) -> SupervisorResult<String> {
        if self.success() {
            Ok(self.stdout)
        } else {
            Err(SupervisorError::execution(self.exit_code, self.stderr))
        }
    }
}
