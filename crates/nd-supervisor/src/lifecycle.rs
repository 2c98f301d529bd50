//! Shared lifecycle bookkeeping for one supervisor.
//!
//! Every transition happens under one lock together with the event it
//! produces, so the exit watcher, the stream readers and `stop()` agree on
//! who reports the end of a process generation.

use crate::{EventEmitter, Invocation, LifecycleState, SupervisorError, SupervisorEvent};

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::broadcast;
use tracing::{info, warn};

/// Transitions a lagging state subscriber can fall behind by.
const STATE_CHANNEL_CAPACITY: usize = 64;

pub(crate) struct Lifecycle {
    inner: Mutex<LifecycleInner>,
    state_tx: broadcast::Sender<LifecycleState>,
    emitter: EventEmitter,
}

struct LifecycleInner {
    state: LifecycleState,
    generation: u64,
    endpoint: Option<String>,
    pid: Option<u32>,
    invocation: Option<Invocation>,
    config_path: Option<PathBuf>,
    stopped_emitted: bool,
}

impl Lifecycle {
    pub(crate) fn new(emitter: EventEmitter) -> Self {
        let (state_tx, _) = broadcast::channel(STATE_CHANNEL_CAPACITY);
        Self {
            inner: Mutex::new(LifecycleInner {
                state: LifecycleState::Idle,
                generation: 0,
                endpoint: None,
                pid: None,
                invocation: None,
                config_path: None,
                stopped_emitted: true,
            }),
            state_tx,
            emitter,
        }
    }

    pub(crate) fn emitter(&self) -> &EventEmitter {
        &self.emitter
    }

    pub(crate) fn emit(&self, event: SupervisorEvent) {
        self.emitter.emit(event);
    }

    /// Every transition from now on, in order.
    pub(crate) fn subscribe_state(&self) -> broadcast::Receiver<LifecycleState> {
        self.state_tx.subscribe()
    }

    pub(crate) fn state(&self) -> LifecycleState {
        self.lock().state
    }

    pub(crate) fn endpoint(&self) -> Option<String> {
        self.lock().endpoint.clone()
    }

    pub(crate) fn pid(&self) -> Option<u32> {
        self.lock().pid
    }

    pub(crate) fn invocation(&self) -> Option<Invocation> {
        self.lock().invocation.clone()
    }

    pub(crate) fn config_path(&self) -> Option<PathBuf> {
        self.lock().config_path.clone()
    }

    /// Enter `Starting` for a freshly spawned process; returns its generation.
    pub(crate) fn begin_generation(
        &self,
        invocation: Invocation,
        config_path: PathBuf,
        pid: Option<u32>,
    ) -> u64 {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.endpoint = None;
        inner.pid = pid;
        inner.invocation = Some(invocation);
        inner.config_path = Some(config_path);
        inner.stopped_emitted = false;
        self.set_state(&mut inner, LifecycleState::Starting);
        inner.generation
    }

    /// `Starting -> Running` on the readiness marker. Emits `ServerReady`.
    ///
    /// Returns false (and emits nothing) for a stale generation or when the
    /// process is not in `Starting`.
    pub(crate) fn mark_ready(&self, generation: u64, endpoint: &str) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation || inner.state != LifecycleState::Starting {
            return false;
        }

        info!(endpoint, "Server started");
        inner.endpoint = Some(endpoint.to_string());
        self.set_state(&mut inner, LifecycleState::Running);
        self.emitter.emit(SupervisorEvent::ServerReady {
            endpoint: endpoint.to_string(),
        });
        true
    }

    /// Record an exit seen by the watcher.
    ///
    /// Only acts when no stop is in progress: `Running` is a crash, `Starting`
    /// is a startup failure. Either way the generation ends here with one
    /// `ServerStopped`.
    pub(crate) fn process_exited(&self, generation: u64, code: Option<i32>) {
        let mut inner = self.lock();
        if inner.generation != generation || inner.stopped_emitted {
            return;
        }

        match inner.state {
            LifecycleState::Running => {
                let crash = SupervisorError::crash(code);
                warn!(code = ?code, "Server exited without a stop request");
                self.set_state(&mut inner, LifecycleState::Crashed);
                self.emitter
                    .emit(SupervisorEvent::process_error(crash.summary()));
            }
            LifecycleState::Starting => {
                warn!(code = ?code, "Server exited before becoming ready");
                self.emitter.emit(SupervisorEvent::server_error(format!(
                    "Server exited before becoming ready (exit code {})",
                    describe_code(code)
                )));
            }
            LifecycleState::Stopping | LifecycleState::Idle | LifecycleState::Crashed => return,
        }

        self.end_generation(&mut inner);
    }

    /// Enter `Stopping`. Returns the generation being stopped, or None if idle.
    pub(crate) fn begin_stop(&self) -> Option<u64> {
        let mut inner = self.lock();
        if inner.state.is_idle() {
            return None;
        }

        self.set_state(&mut inner, LifecycleState::Stopping);
        Some(inner.generation)
    }

    /// Return to `Idle` after a stop, emitting `ServerStopped` unless the
    /// watcher already did.
    pub(crate) fn finish_stop(&self, generation: u64) {
        let mut inner = self.lock();
        if inner.generation != generation {
            return;
        }

        if inner.stopped_emitted {
            if inner.state != LifecycleState::Idle {
                self.set_state(&mut inner, LifecycleState::Idle);
            }
            return;
        }

        info!("Server stopped");
        self.end_generation(&mut inner);
    }

    fn end_generation(&self, inner: &mut LifecycleInner) {
        inner.pid = None;
        inner.stopped_emitted = true;
        self.set_state(inner, LifecycleState::Idle);
        self.emitter.emit(SupervisorEvent::ServerStopped);
    }

    fn set_state(&self, inner: &mut LifecycleInner, state: LifecycleState) {
        inner.state = state;
        // Err only means nobody is listening
        let _ = self.state_tx.send(state);
    }

    fn lock(&self) -> MutexGuard<'_, LifecycleInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

pub(crate) fn describe_code(code: Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "none (terminated by signal)".into())
}
