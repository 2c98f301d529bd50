mod chunk_reader;
mod error;
mod lifecycle;
mod supervisor_event;


use crate::{LifecycleState, SupervisorEvent};

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::sync::mpsc::UnboundedReceiver;

const EVENT_WAIT: Duration = Duration::from_secs(10);

/// Receive events until `done` matches one (inclusive) or the wait runs out.
pub(crate) async fn collect_until<F>(
    rx: &mut UnboundedReceiver<SupervisorEvent>,
    mut done: F,
) -> Vec<SupervisorEvent>
where
    F: FnMut(&SupervisorEvent) -> bool,
{
    let mut events = Vec::new();
    let _ = tokio::time::timeout(EVENT_WAIT, async {
        while let Some(event) = rx.recv().await {
            let finished = done(&event);
            events.push(event);
            if finished {
                break;
            }
        }
    })
    .await;
    events
}

/// Everything already queued, without waiting.
pub(crate) fn drain(rx: &mut UnboundedReceiver<SupervisorEvent>) -> Vec<SupervisorEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// State transitions already published, without waiting.
pub(crate) fn drain_states(rx: &mut broadcast::Receiver<LifecycleState>) -> Vec<LifecycleState> {
    let mut states = Vec::new();
    while let Ok(state) = rx.try_recv() {
        states.push(state);
    }
    states
}

/// Event kinds with output chunks left out.
pub(crate) fn lifecycle_kinds(events: &[SupervisorEvent]) -> Vec<&'static str> {
    events
        .iter()
        .filter(|e| !matches!(e, SupervisorEvent::OutputChunk { .. }))
        .map(SupervisorEvent::kind)
        .collect()
}

#[cfg(unix)]
pub(crate) use fake_tool::FakeTool;

#[cfg(unix)]
mod fake_tool {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    use nd_config::SupervisorConfig;
    use tempfile::TempDir;

    /// Shell script standing in for the netter executable, plus an input
    /// file next to it.
    pub(crate) struct FakeTool {
        dir: TempDir,
        executable: PathBuf,
        input: PathBuf,
    }

    impl FakeTool {
        pub(crate) fn new(script: &str) -> Self {
            let dir = TempDir::new().unwrap();
            let executable = dir.path().join("netter");
            fs::write(&executable, format!("#!/bin/sh\n{script}\n")).unwrap();
            fs::set_permissions(&executable, fs::Permissions::from_mode(0o755)).unwrap();

            let input = dir.path().join("routes.rd");
            fs::write(&input, "route GET / -> 200\n").unwrap();

            Self {
                dir,
                executable,
                input,
            }
        }

        /// Server that announces readiness and then sleeps.
        pub(crate) fn ready_server() -> Self {
            Self::new("echo 'booting'\necho 'server starting at 127.0.0.1:8080'\nexec sleep 30")
        }

        pub(crate) fn dir(&self) -> &Path {
            self.dir.path()
        }

        pub(crate) fn input(&self) -> &Path {
            &self.input
        }

        /// Defaults pointing at this script, with a short restart delay.
        pub(crate) fn config(&self) -> SupervisorConfig {
            let mut config = SupervisorConfig::default();
            config.tool.executable = self.executable.to_string_lossy().into_owned();
            config.timeouts.restart_delay_ms = 50;
            config
        }
    }
}

/// Whether a process with this pid still exists (zombies included).
#[cfg(unix)]
pub(crate) fn pid_exists(pid: u32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    !matches!(kill(Pid::from_raw(pid as i32), None), Err(Errno::ESRCH))
}
