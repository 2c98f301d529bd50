//! nd - netter server supervisor
//!
//! Runs the external `netter` tool as a supervised child process.
//!
//! # Examples
//!
//! ```bash
//! # Serve a route file until Ctrl+C
//! nd start routes.rd
//!
//! # Same, with machine-readable events
//! nd start routes.rd --json
//!
//! # Is netter installed?
//! nd check
//!
//! # Parse once and print the result
//! nd parse routes.rd
//! ```

mod cli;
mod commands;
mod error;
mod event_printer;
mod handlers;
mod logging;
mod shutdown_signal;

#[cfg(test)]
mod tests;

use crate::{
    cli::Cli,
    commands::Commands,
    error::{CliError, CliResult},
    event_printer::EventPrinter,
    logging::{current_log_path, setup_logging},
    shutdown_signal::ShutdownSignal,
};

use std::process::ExitCode;

use clap::Parser;
use nd_config::SupervisorConfig;
use nd_supervisor::Supervisor;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            if let Some(hint) = e.recovery_hint() {
                eprintln!("{hint}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<ExitCode> {
    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => SupervisorConfig::config_dir()?,
    };

    let config = SupervisorConfig::load_from(&config_dir)?;
    config.validate()?;

    let logs_dir = config.log_dir(&config_dir);
    setup_logging(&logs_dir, &config.logging)?;
    info!("Starting nd v{}", env!("CARGO_PKG_VERSION"));
    debug!(
        "Writing logs to {}",
        current_log_path(&logs_dir, &config.logging).display()
    );
    config.log_summary();

    let supervisor = Supervisor::new(config);
    let mut out = std::io::stdout();

    match cli.command {
        Commands::Start { path, json } => {
            handlers::start(&supervisor, &path, json, ShutdownSignal::install()).await
        }
        Commands::Check => handlers::check(&supervisor, &mut out).await,
        Commands::Parse { path } => handlers::parse(&supervisor, &path, &mut out).await,
        Commands::Run { args } => {
            handlers::run(&supervisor, &args, &mut out, &mut std::io::stderr()).await
        }
    }
}
