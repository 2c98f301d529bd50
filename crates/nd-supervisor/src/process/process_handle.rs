//! Ownership of exactly one OS child process.

use crate::process::{ChunkReader, WaitOutcome};
use crate::{Invocation, SupervisorError, SupervisorResult};

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::{debug, info, warn};

/// A spawned child with piped stdout/stderr.
///
/// The child runs in its own process group on Unix so that signals reach any
/// helpers it forks, and it is killed if the handle is dropped while alive.
pub struct ProcessHandle {
    child: Child,
    pid: Option<u32>,
    command: String,
}

impl ProcessHandle {
    /// Spawn the invocation and confirm the OS created the process.
    ///
    /// Fails with [`SupervisorError::Launch`] when the executable is missing
    /// or not executable, or when confirmation takes longer than the
    /// invocation's start timeout.
    pub async fn spawn(invocation: &Invocation) -> SupervisorResult<Self> {
        let command = invocation.command_line();

        let mut cmd = Command::new(invocation.program());
        cmd.args(invocation.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = invocation.working_dir() {
            cmd.current_dir(dir);
        }
        if let Some(path) = invocation.path_env() {
            cmd.env("PATH", path);
        }

        #[cfg(unix)]
        cmd.process_group(0);

        // Spawn on the blocking pool so the start timeout bounds it. A child
        // that arrives after the deadline is dropped and killed.
        let runtime = tokio::runtime::Handle::current();
        let spawning = tokio::task::spawn_blocking(move || {
            let _guard = runtime.enter();
            cmd.spawn()
        });

        let timeout = invocation.start_timeout();
        let child = match tokio::time::timeout(timeout, spawning).await {
            Ok(Ok(Ok(child))) => child,
            Ok(Ok(Err(e))) => {
                warn!(command = %command, error = %e, "Failed to spawn process");
                return Err(SupervisorError::launch_io(command, &e));
            }
            Ok(Err(join)) => {
                warn!(command = %command, error = %join, "Spawn task failed");
                return Err(SupervisorError::launch(command, join.to_string()));
            }
            Err(_) => {
                return Err(SupervisorError::launch(
                    command,
                    format!("process did not start within {}ms", timeout.as_millis()),
                ));
            }
        };

        let pid = child.id();
        info!(command = %command, pid = ?pid, "Process started");

        Ok(Self {
            child,
            pid,
            command,
        })
    }

    /// PID assigned at spawn time.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Non-blocking liveness check.
    pub fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Take the stdout reader. Available once per process.
    pub fn take_stdout(&mut self) -> Option<ChunkReader<ChildStdout>> {
        self.child.stdout.take().map(ChunkReader::new)
    }

    /// Take the stderr reader. Available once per process.
    pub fn take_stderr(&mut self) -> Option<ChunkReader<ChildStderr>> {
        self.child.stderr.take().map(ChunkReader::new)
    }

    /// Ask the process to stop (SIGTERM to its process group).
    pub fn terminate(&mut self) -> SupervisorResult<()> {
        // None once reaped: the pid may already belong to someone else
        let Some(pid) = self.child.id() else {
            return Ok(());
        };

        debug!(pid, "Sending SIGTERM");

        #[cfg(unix)]
        {
            use nix::sys::signal::{Signal, killpg};
            signal_group(pid, |group| killpg(group, Signal::SIGTERM))?;
        }

        #[cfg(not(unix))]
        {
            // No graceful equivalent without a console; escalate directly
            self.child.start_kill()?;
        }

        Ok(())
    }

    /// Force termination (SIGKILL to the process group).
    pub fn kill(&mut self) -> SupervisorResult<()> {
        let Some(pid) = self.child.id() else {
            return Ok(());
        };

        warn!(pid, command = %self.command, "Force killing process");

        #[cfg(unix)]
        {
            use nix::sys::signal::{Signal, killpg};
            signal_group(pid, |group| killpg(group, Signal::SIGKILL))?;
        }

        match self.child.start_kill() {
            Ok(()) => Ok(()),
            // Already exited between the id() check and the kill
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Wait up to `timeout` for the process to exit.
    pub async fn wait(&mut self, timeout: Duration) -> SupervisorResult<WaitOutcome> {
        match tokio::time::timeout(timeout, self.child.wait()).await {
            Ok(status) => Ok(WaitOutcome::Exited(status?)),
            Err(_) => Ok(WaitOutcome::StillAlive),
        }
    }

    /// Wait for the process to exit, however long it takes.
    pub async fn wait_exit(&mut self) -> SupervisorResult<ExitStatus> {
        Ok(self.child.wait().await?)
    }
}

#[cfg(unix)]
fn signal_group<F>(pid: u32, send: F) -> SupervisorResult<()>
where
    F: FnOnce(nix::unistd::Pid) -> nix::Result<()>,
{
    let Ok(raw) = i32::try_from(pid) else {
        return Ok(());
    };

    match send(nix::unistd::Pid::from_raw(raw)) {
        Ok(()) | Err(nix::errno::Errno::ESRCH) => Ok(()),
        Err(errno) => Err(std::io::Error::from(errno).into()),
    }
}
