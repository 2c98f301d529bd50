//! Turns raw server output into lifecycle events.

use crate::lifecycle::{Lifecycle, describe_code};
use crate::{LineBuffer, OutputStream, SupervisorEvent};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, Mutex};

use regex::Regex;
use tracing::debug;

static READY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"server starting at (\S+)").expect("valid regex"));

/// Endpoint announced by a readiness line, if the line carries the marker.
///
/// ```
/// use nd_supervisor::parse_ready_marker;
///
/// assert_eq!(parse_ready_marker("server starting at 127.0.0.1:8080"), Some("127.0.0.1:8080"));
/// assert_eq!(parse_ready_marker("listening"), None);
/// ```
pub fn parse_ready_marker(line: &str) -> Option<&str> {
    READY_MARKER
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Per-generation output classifier.
///
/// Every chunk is forwarded verbatim. Stdout is additionally reassembled
/// into lines and scanned for the readiness marker; stderr counts as a
/// startup error until the server is ready.
pub struct OutputClassifier {
    lifecycle: Arc<Lifecycle>,
    generation: u64,
    lines: Mutex<LineBuffer>,
    ready: AtomicBool,
}

impl OutputClassifier {
    pub(crate) fn new(lifecycle: Arc<Lifecycle>, generation: u64, max_line_bytes: usize) -> Self {
        Self {
            lifecycle,
            generation,
            lines: Mutex::new(LineBuffer::new(max_line_bytes)),
            ready: AtomicBool::new(false),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the readiness marker has been seen for this generation.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn on_stdout(&self, chunk: &str) {
        self.lifecycle.emit(SupervisorEvent::OutputChunk {
            stream: OutputStream::Stdout,
            text: chunk.to_string(),
        });

        let lines = self.lock_lines().push(chunk);
        for line in lines {
            self.scan_line(&line);
        }
    }

    pub fn on_stderr(&self, chunk: &str) {
        self.lifecycle.emit(SupervisorEvent::OutputChunk {
            stream: OutputStream::Stderr,
            text: chunk.to_string(),
        });

        if !self.is_ready() {
            self.lifecycle
                .emit(SupervisorEvent::server_error(chunk.to_string()));
        }
    }

    /// Stdout reached EOF: the trailing partial line gets one last scan.
    pub fn on_stdout_closed(&self) {
        let tail = self.lock_lines().finish();
        if let Some(line) = tail {
            self.scan_line(&line);
        }
    }

    /// The process exited and both pipes have been drained.
    pub fn on_exit(&self, code: Option<i32>) {
        debug!(
            generation = self.generation,
            code = %describe_code(code),
            "Server process exited"
        );
        self.lifecycle.process_exited(self.generation, code);
    }

    fn scan_line(&self, line: &str) {
        if self.is_ready() {
            return;
        }

        if let Some(endpoint) = parse_ready_marker(line)
            && self.lifecycle.mark_ready(self.generation, endpoint)
        {
            self.ready.store(true, Ordering::Release);
        }
    }

    fn lock_lines(&self) -> std::sync::MutexGuard<'_, LineBuffer> {
        self.lines
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}
