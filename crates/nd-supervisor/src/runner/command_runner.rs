//! One-shot execution of the tool with output capture.

use crate::process::{ProcessHandle, WaitOutcome};
use crate::{CommandOutput, Invocation, SupervisorError, SupervisorResult};

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const READER_JOIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Runs an invocation to completion and captures both streams.
///
/// If the invocation carries an exec timeout and the process outlives it,
/// the process group is killed and [`SupervisorError::Timeout`] is returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self, invocation: &Invocation) -> SupervisorResult<CommandOutput> {
        let mut handle = ProcessHandle::spawn(invocation).await?;
        let command = handle.command().to_string();

        let stdout = handle
            .take_stdout()
            .map(|reader| tokio::spawn(reader.read_to_end()));
        let stderr = handle
            .take_stderr()
            .map(|reader| tokio::spawn(reader.read_to_end()));

        let status = match invocation.exec_timeout() {
            Some(timeout) => match handle.wait(timeout).await? {
                WaitOutcome::Exited(status) => status,
                WaitOutcome::StillAlive => {
                    warn!(command = %command, timeout_ms = timeout.as_millis() as u64, "Command timed out");
                    handle.kill()?;
                    handle.wait_exit().await?;
                    for reader in [stdout, stderr].into_iter().flatten() {
                        reader.abort();
                    }
                    return Err(SupervisorError::timeout(
                        command,
                        timeout.as_millis() as u64,
                    ));
                }
            },
            None => handle.wait_exit().await?,
        };

        let output = CommandOutput {
            stdout: collect(stdout, "stdout").await,
            stderr: collect(stderr, "stderr").await,
            exit_code: status.code(),
        };

        info!(command = %command, exit_code = ?output.exit_code, "Command finished");
        Ok(output)
    }
}

async fn collect(
    reader: Option<JoinHandle<std::io::Result<String>>>,
    stream: &'static str,
) -> String {
    let Some(mut reader) = reader else {
        return String::new();
    };

    match tokio::time::timeout(READER_JOIN_TIMEOUT, &mut reader).await {
        Ok(Ok(Ok(text))) => text,
        Ok(Ok(Err(e))) => {
            warn!(stream, error = %e, "Failed to read command output");
            String::new()
        }
        Ok(Err(e)) => {
            warn!(stream, error = %e, "Output reader task failed");
            String::new()
        }
        Err(_) => {
            debug!(stream, "Output pipe still open after exit, discarding");
            reader.abort();
            String::new()
        }
    }
}
