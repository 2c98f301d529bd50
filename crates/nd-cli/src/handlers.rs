//! One function per subcommand.

use crate::{CliResult, EventPrinter, ShutdownSignal};

use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use nd_supervisor::{Supervisor, SupervisorEvent};
use tracing::{info, warn};

/// Start the server and print its events until it stops or a shutdown
/// signal arrives. Fails if the server never became ready or crashed.
pub async fn start(
    supervisor: &Supervisor,
    path: &Path,
    json: bool,
    mut shutdown: ShutdownSignal,
) -> CliResult<ExitCode> {
    let mut events = supervisor.subscribe();
    let mut printer = EventPrinter::new(json);
    let mut out = std::io::stdout();
    let mut err = std::io::stderr();

    let started = supervisor.start(path).await;
    if !started {
        while let Ok(event) = events.try_recv() {
            printer.print(&event, &mut out, &mut err)?;
        }
        return Ok(ExitCode::FAILURE);
    }

    let mut failed = false;
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    break;
                };
                printer.print(&event, &mut out, &mut err)?;
                out.flush()?;

                match event {
                    SupervisorEvent::ProcessError { .. } => failed = true,
                    SupervisorEvent::ServerStopped => {
                        // Stopped without ever becoming ready
                        if supervisor.endpoint().is_none() {
                            failed = true;
                        }
                        break;
                    }
                    _ => {}
                }
            }
            _ = shutdown.wait() => {
                info!("Stopping server on shutdown request");
                supervisor.stop().await;
                while let Ok(event) = events.try_recv() {
                    printer.print(&event, &mut out, &mut err)?;
                }
                break;
            }
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Report whether the tool can be run, with its version.
pub async fn check<W: Write>(supervisor: &Supervisor, out: &mut W) -> CliResult<ExitCode> {
    let program = supervisor.config().tool.program();

    match supervisor.tool_version().await {
        Some(version) => {
            writeln!(out, "{} is available: {version}", program.display())?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            warn!(program = %program.display(), "Tool is not available");
            writeln!(
                out,
                "{} is not available (set NETTER_PATH or tool.executable)",
                program.display()
            )?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Parse a route file once and print what the tool printed.
pub async fn parse<W: Write>(
    supervisor: &Supervisor,
    path: &Path,
    out: &mut W,
) -> CliResult<ExitCode> {
    let stdout = supervisor.parse_file(path).await?;
    write!(out, "{stdout}")?;
    Ok(ExitCode::SUCCESS)
}

/// Run the tool with raw arguments and mirror its exit code.
pub async fn run<O, E>(
    supervisor: &Supervisor,
    args: &[OsString],
    out: &mut O,
    err: &mut E,
) -> CliResult<ExitCode>
where
    O: Write,
    E: Write,
{
    let output = supervisor.run(args).await?;
    write!(out, "{}", output.stdout)?;
    write!(err, "{}", output.stderr)?;
    Ok(exit_code(output.exit_code))
}

/// Tool exit code as our own; signals and out-of-range codes become 1.
pub fn exit_code(code: Option<i32>) -> ExitCode {
    match code.and_then(|c| u8::try_from(c).ok()) {
        Some(code) => ExitCode::from(code),
        None => ExitCode::FAILURE,
    }
}
