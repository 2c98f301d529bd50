//! Lifecycle controller for the netter server process.

use crate::lifecycle::Lifecycle;
use crate::monitor::ProcessMonitor;
use crate::process::ProcessHandle;
use crate::{
    AvailabilityProber, CommandOutput, CommandRunner, EventEmitter, Invocation, LifecycleState,
    OutputClassifier, SupervisorError, SupervisorEvent, SupervisorResult,
};

use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use nd_config::SupervisorConfig;
use tokio::sync::{Mutex, broadcast, mpsc};
use tracing::{debug, error, info, warn};

/// Upper bound for the watcher to finish reporting once the process is gone.
const MONITOR_FINISH_TIMEOUT: Duration = Duration::from_secs(3);

/// Starts, stops and restarts one long-running `netter parse` server and
/// reports what it does through [`SupervisorEvent`]s.
///
/// At most one server process is alive per supervisor. Lifecycle operations
/// are serialized; queries never wait on them.
pub struct Supervisor {
    config: SupervisorConfig,
    lifecycle: Arc<Lifecycle>,
    runner: CommandRunner,
    prober: AvailabilityProber,
    // Held across each whole start/stop/restart
    slot: Mutex<Option<ProcessMonitor>>,
}

impl Supervisor {
    pub fn new(config: SupervisorConfig) -> Self {
        let prober = AvailabilityProber::new(&config);
        Self {
            config,
            lifecycle: Arc::new(Lifecycle::new(EventEmitter::new())),
            runner: CommandRunner::new(),
            prober,
            slot: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    /// Receive every event emitted from now on.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SupervisorEvent> {
        self.lifecycle.emitter().subscribe()
    }

    /// Receive every lifecycle state transition from now on.
    pub fn state_changes(&self) -> broadcast::Receiver<LifecycleState> {
        self.lifecycle.subscribe_state()
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// True only between the readiness marker and the end of the process.
    pub fn is_running(&self) -> bool {
        self.state() == LifecycleState::Running
    }

    /// `host:port` reported by the current generation, once ready.
    pub fn endpoint(&self) -> Option<String> {
        self.lifecycle.endpoint()
    }

    pub fn pid(&self) -> Option<u32> {
        self.lifecycle.pid()
    }

    /// Invocation of the most recently started server.
    pub fn current_invocation(&self) -> Option<Invocation> {
        self.lifecycle.invocation()
    }

    /// Launch `netter parse --path <config_path>` as a long-running server.
    ///
    /// Returns true once the process was spawned. Readiness is reported
    /// later through [`SupervisorEvent::ServerReady`]. Returns false without
    /// side effects when a server is already active, and false with a
    /// [`SupervisorEvent::ProcessError`] when the file is missing or the
    /// spawn fails.
    pub async fn start<P: AsRef<Path>>(&self, config_path: P) -> bool {
        let mut slot = self.slot.lock().await;
        self.start_locked(&mut slot, config_path.as_ref()).await
    }

    /// Stop the active server: SIGTERM, then SIGKILL after the stop timeout.
    ///
    /// Returns true when no process remains. Stopping an idle supervisor is
    /// a no-op that returns true.
    pub async fn stop(&self) -> bool {
        let mut slot = self.slot.lock().await;
        self.stop_locked(&mut slot).await
    }

    /// Stop the running server and start it again with the same file.
    ///
    /// Only valid while `Running`; returns false otherwise.
    pub async fn restart(&self) -> bool {
        let mut slot = self.slot.lock().await;

        if self.lifecycle.state() != LifecycleState::Running {
            warn!(state = %self.lifecycle.state(), "Server is not running, cannot restart");
            return false;
        }
        let Some(config_path) = self.lifecycle.config_path() else {
            warn!("No previous server invocation to restart");
            return false;
        };

        info!(path = %config_path.display(), "Restarting server");
        self.stop_locked(&mut slot).await;
        tokio::time::sleep(self.config.timeouts.restart_delay()).await;
        self.start_locked(&mut slot, &config_path).await
    }

    /// Probe `<tool> --version`. Never errors.
    pub async fn is_tool_available(&self) -> bool {
        self.prober.is_available().await
    }

    /// Tool version line, when the tool is available.
    pub async fn tool_version(&self) -> Option<String> {
        self.prober.version().await
    }

    /// Run the tool once with `args` and capture its output.
    pub async fn run<I, S>(&self, args: I) -> SupervisorResult<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let invocation = Invocation::for_tool(&self.config, args)
            .with_exec_timeout(self.config.timeouts.exec_timeout());
        self.runner.run(&invocation).await
    }

    /// Run `netter parse --path <path>` to completion and return its stdout.
    ///
    /// Failures are returned and also emitted as `ProcessError`.
    pub async fn parse_file<P: AsRef<Path>>(&self, path: P) -> SupervisorResult<String> {
        let result = self.parse_file_inner(path.as_ref()).await;
        if let Err(e) = &result {
            warn!(error = %e, "Parse failed");
            self.lifecycle
                .emit(SupervisorEvent::process_error(e.summary()));
        }
        result
    }

    async fn parse_file_inner(&self, path: &Path) -> SupervisorResult<String> {
        if !path.exists() {
            return Err(SupervisorError::input_missing(path));
        }
        let absolute = std::path::absolute(path)?;

        let invocation = self
            .parse_invocation(&absolute)
            .with_exec_timeout(self.config.timeouts.exec_timeout());
        self.lifecycle.emit(SupervisorEvent::ProcessLaunched {
            command: invocation.command_line(),
        });

        self.runner.run(&invocation).await?.into_success()
    }

    #[cfg(test)]
    pub(crate) async fn adopt_monitor(&self, monitor: ProcessMonitor) {
        *self.slot.lock().await = Some(monitor);
    }

    fn parse_invocation(&self, absolute: &Path) -> Invocation {
        Invocation::for_tool(&self.config, ["parse", "--path"]).arg(absolute)
    }

    async fn start_locked(&self, slot: &mut Option<ProcessMonitor>, config_path: &Path) -> bool {
        let state = self.lifecycle.state();
        if !state.is_idle() {
            warn!(%state, "Server is already running");
            return false;
        }

        if !config_path.exists() {
            let err = SupervisorError::input_missing(config_path);
            warn!(error = %err, "Cannot start server");
            self.lifecycle
                .emit(SupervisorEvent::process_error(err.summary()));
            return false;
        }

        if let Some(stale) = slot.take()
            && let Some(survivor) = self.shutdown_monitor(stale, false).await
        {
            let pid = survivor.pid();
            *slot = Some(survivor);
            error!(pid = ?pid, "Previous server process is still alive, refusing to start");
            self.lifecycle.emit(SupervisorEvent::process_error(format!(
                "Previous server process {} is still alive",
                describe_pid(pid)
            )));
            return false;
        }

        let absolute = match std::path::absolute(config_path) {
            Ok(path) => path,
            Err(e) => {
                let err = SupervisorError::from(e);
                warn!(error = %err, "Cannot resolve input path");
                self.lifecycle
                    .emit(SupervisorEvent::process_error(err.summary()));
                return false;
            }
        };

        let invocation = self.parse_invocation(&absolute);
        let command = invocation.command_line();
        info!(command = %command, "Starting server");
        self.lifecycle
            .emit(SupervisorEvent::ProcessLaunched { command });

        let handle = match ProcessHandle::spawn(&invocation).await {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "{}", e.recovery_hint());
                self.lifecycle
                    .emit(SupervisorEvent::process_error(e.summary()));
                return false;
            }
        };

        let generation = self
            .lifecycle
            .begin_generation(invocation, absolute, handle.pid());
        let classifier = Arc::new(OutputClassifier::new(
            Arc::clone(&self.lifecycle),
            generation,
            self.config.timeouts.max_line_bytes,
        ));
        *slot = Some(ProcessMonitor::spawn(handle, classifier));

        debug!(generation, "Server process spawned");
        true
    }

    async fn stop_locked(&self, slot: &mut Option<ProcessMonitor>) -> bool {
        let Some(generation) = self.lifecycle.begin_stop() else {
            debug!("Server is not running, nothing to stop");
            return true;
        };

        info!("Stopping server...");
        if let Some(monitor) = slot.take() {
            // An unkillable process is kept so the next start retries cleanup
            *slot = self.shutdown_monitor(monitor, true).await;
        }

        self.lifecycle.finish_stop(generation);
        true
    }

    /// Terminate, escalate to kill, then let the watcher finish reporting.
    ///
    /// Returns the monitor back if the process survived SIGKILL.
    async fn shutdown_monitor(
        &self,
        monitor: ProcessMonitor,
        report: bool,
    ) -> Option<ProcessMonitor> {
        let timeouts = &self.config.timeouts;

        if !monitor.has_exited() {
            monitor.terminate();
            if !monitor.wait_exit(timeouts.stop_timeout()).await {
                info!(pid = ?monitor.pid(), "Server did not exit after SIGTERM, killing");
                monitor.kill();

                if !monitor.wait_exit(timeouts.kill_timeout()).await {
                    error!(pid = ?monitor.pid(), "Server process survived SIGKILL");
                    if report {
                        self.lifecycle.emit(SupervisorEvent::process_error(format!(
                            "Server process {} could not be killed",
                            describe_pid(monitor.pid())
                        )));
                    }
                    return Some(monitor);
                }
            }
        }

        monitor.finish(MONITOR_FINISH_TIMEOUT).await;
        None
    }
}

fn describe_pid(pid: Option<u32>) -> String {
    pid.map_or_else(|| "?".to_string(), |pid| pid.to_string())
}
