use crate::{CommandOutput, CommandRunner, Invocation, SupervisorError, SupervisorResult};

use nd_config::SupervisorConfig;
use tracing::{debug, warn};

/// Checks whether the configured tool can be executed at all.
///
/// Runs `<tool> --version` with the short probe timeouts. Failures are
/// logged and reported as "unavailable"; the probe never errors.
#[derive(Debug, Clone)]
pub struct AvailabilityProber {
    invocation: Invocation,
    runner: CommandRunner,
}

impl AvailabilityProber {
    pub fn new(config: &SupervisorConfig) -> Self {
        let invocation = Invocation::for_tool(config, ["--version"])
            .with_start_timeout(config.timeouts.probe_start_timeout())
            .with_exec_timeout(config.timeouts.probe_exec_timeout());

        Self {
            invocation,
            runner: CommandRunner::new(),
        }
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// True only if the tool started and exited with code 0.
    pub async fn is_available(&self) -> bool {
        match self.probe().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "{}", e.recovery_hint());
                false
            }
        }
    }

    /// First line of the `--version` output, if the tool is available.
    pub async fn version(&self) -> Option<String> {
        let output = self.probe().await.ok()?;
        output
            .stdout
            .lines()
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
    }

    async fn probe(&self) -> SupervisorResult<CommandOutput> {
        debug!(command = %self.invocation.command_line(), "Probing tool availability");

        let output = self
            .runner
            .run(&self.invocation)
            .await
            .map_err(|e| SupervisorError::probe_unavailable(e.summary()))?;

        if !output.success() {
            return Err(SupervisorError::probe_unavailable(format!(
                "`{}` exited with code {:?}",
                self.invocation.command_line(),
                output.exit_code
            )));
        }

        debug!(version = %output.stdout.trim(), "Tool is available");
        Ok(output)
    }
}
