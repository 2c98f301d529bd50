//! Exit watcher for one server process generation.

use crate::OutputClassifier;
use crate::monitor::ProcessCommand;
use crate::process::{ChunkReader, ProcessHandle};

use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncRead;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How long the watcher waits for the readers to hit EOF after the exit.
///
/// A grandchild that inherited the pipes can keep them open forever.
const READER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Spawned watcher task plus the channels used to talk to it.
///
/// The task owns the [`ProcessHandle`]. It reaps the process, publishes the
/// exit status, drains both readers and then reports the exit to the
/// classifier. Dropping the monitor closes the command channel, which makes
/// the watcher kill a still-running process.
pub(crate) struct ProcessMonitor {
    pid: Option<u32>,
    command_tx: mpsc::UnboundedSender<ProcessCommand>,
    exit_rx: watch::Receiver<Option<Option<ExitStatus>>>,
    task: JoinHandle<()>,
}

impl ProcessMonitor {
    pub(crate) fn spawn(mut handle: ProcessHandle, classifier: Arc<OutputClassifier>) -> Self {
        let pid = handle.pid();

        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = handle.take_stdout() {
            let classifier = Arc::clone(&classifier);
            readers.push(tokio::spawn(async move {
                pump(stdout, "stdout", |chunk| classifier.on_stdout(chunk)).await;
                classifier.on_stdout_closed();
            }));
        }
        if let Some(stderr) = handle.take_stderr() {
            let classifier = Arc::clone(&classifier);
            readers.push(tokio::spawn(async move {
                pump(stderr, "stderr", |chunk| classifier.on_stderr(chunk)).await;
            }));
        }

        let (command_tx, mut command_rx) = mpsc::unbounded_channel();
        let (exit_tx, exit_rx) = watch::channel(None);

        let task = tokio::spawn(async move {
            let status = watch_process(&mut handle, &mut command_rx).await;
            exit_tx.send_replace(Some(status));

            drain_readers(readers).await;
            classifier.on_exit(status.and_then(|s| s.code()));
        });

        Self {
            pid,
            command_tx,
            exit_rx,
            task,
        }
    }

    /// Monitor for a process that ignores every signal and never exits.
    #[cfg(test)]
    pub(crate) fn unresponsive(pid: u32) -> Self {
        let (command_tx, mut command_rx) = mpsc::unbounded_channel::<ProcessCommand>();
        let (exit_tx, exit_rx) = watch::channel(None);

        let task = tokio::spawn(async move {
            let _exit_tx = exit_tx;
            while command_rx.recv().await.is_some() {}
        });

        Self {
            pid: Some(pid),
            command_tx,
            exit_rx,
            task,
        }
    }

    pub(crate) fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Whether the process has been reaped.
    pub(crate) fn has_exited(&self) -> bool {
        self.exit_rx.borrow().is_some()
    }

    pub(crate) fn terminate(&self) {
        self.send(ProcessCommand::Terminate);
    }

    pub(crate) fn kill(&self) {
        self.send(ProcessCommand::Kill);
    }

    /// Wait up to `timeout` for the process to exit. Returns true if it did.
    pub(crate) async fn wait_exit(&self, timeout: Duration) -> bool {
        let mut exit_rx = self.exit_rx.clone();
        match tokio::time::timeout(timeout, exit_rx.wait_for(Option::is_some)).await {
            Ok(Ok(_)) => true,
            // Sender gone: the watcher task has finished
            Ok(Err(_)) => true,
            Err(_) => false,
        }
    }

    /// Wait for the watcher to finish its exit reporting, aborting it after
    /// `timeout`.
    pub(crate) async fn finish(mut self, timeout: Duration) {
        if tokio::time::timeout(timeout, &mut self.task).await.is_err() {
            warn!(pid = ?self.pid, "Exit watcher did not finish, aborting it");
            self.task.abort();
        }
    }

    fn send(&self, command: ProcessCommand) {
        if self.command_tx.send(command).is_err() {
            debug!(pid = ?self.pid, ?command, "Exit watcher already finished");
        }
    }
}

async fn watch_process(
    handle: &mut ProcessHandle,
    commands: &mut mpsc::UnboundedReceiver<ProcessCommand>,
) -> Option<ExitStatus> {
    let mut commands_open = true;

    loop {
        tokio::select! {
            status = handle.wait_exit() => {
                return match status {
                    Ok(status) => Some(status),
                    Err(e) => {
                        warn!(pid = ?handle.pid(), error = %e, "Failed to wait for server process");
                        None
                    }
                };
            }
            command = commands.recv(), if commands_open => {
                let result = match command {
                    Some(ProcessCommand::Terminate) => handle.terminate(),
                    Some(ProcessCommand::Kill) => handle.kill(),
                    None => {
                        // Monitor dropped: nobody is left to stop the process
                        commands_open = false;
                        handle.kill()
                    }
                };
                if let Err(e) = result {
                    warn!(pid = ?handle.pid(), error = %e, "Failed to signal server process");
                }
            }
        }
    }
}

async fn pump<R, F>(mut reader: ChunkReader<R>, stream: &'static str, mut on_chunk: F)
where
    R: AsyncRead + Unpin,
    F: FnMut(&str),
{
    loop {
        match reader.next_chunk().await {
            Ok(Some(chunk)) => on_chunk(&chunk),
            Ok(None) => break,
            Err(e) => {
                warn!(stream, error = %e, "Failed to read server output");
                break;
            }
        }
    }
}

async fn drain_readers(readers: Vec<JoinHandle<()>>) {
    for mut reader in readers {
        if tokio::time::timeout(READER_DRAIN_TIMEOUT, &mut reader)
            .await
            .is_err()
        {
            debug!("Output pipe still open after exit, abandoning reader");
            reader.abort();
        }
    }
}
