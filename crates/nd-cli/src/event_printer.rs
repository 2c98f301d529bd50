use crate::CliResult;

use std::io::Write;

use nd_supervisor::{OutputStream, SupervisorEvent};

/// Writes supervisor events for a terminal or as JSON lines.
///
/// Text mode passes server output through unchanged and prefixes lifecycle
/// events with `nd:`. A startup error that only repeats the stderr chunk
/// just printed is not shown twice.
pub struct EventPrinter {
    json: bool,
    last_stderr: Option<String>,
}

impl EventPrinter {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            last_stderr: None,
        }
    }

    pub fn print<O, E>(
        &mut self,
        event: &SupervisorEvent,
        out: &mut O,
        err: &mut E,
    ) -> CliResult<()>
    where
        O: Write,
        E: Write,
    {
        if self.json {
            serde_json::to_writer(&mut *out, event)?;
            writeln!(out)?;
            return Ok(());
        }

        match event {
            SupervisorEvent::OutputChunk { stream, text } => match stream {
                OutputStream::Stdout => write!(out, "{text}")?,
                OutputStream::Stderr => {
                    write!(err, "{text}")?;
                    self.last_stderr = Some(text.clone());
                }
            },
            SupervisorEvent::ServerError { message } => {
                if self.last_stderr.as_deref() != Some(message.as_str()) {
                    writeln!(err, "nd: server error: {}", message.trim_end())?;
                }
            }
            SupervisorEvent::ProcessLaunched { command } => {
                writeln!(err, "nd: launching {command}")?
            }
            SupervisorEvent::ProcessError { message } => writeln!(err, "nd: error: {message}")?,
            SupervisorEvent::ServerReady { endpoint } => {
                writeln!(err, "nd: server ready at {endpoint}")?
            }
            SupervisorEvent::ServerStopped => writeln!(err, "nd: server stopped")?,
        }

        Ok(())
    }
}
