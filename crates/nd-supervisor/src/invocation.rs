use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Duration;

use nd_config::SupervisorConfig;

const DEFAULT_START_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything needed to spawn one process.
///
/// Built once per spawn attempt; the builder methods consume `self`, so a
/// finished invocation is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
    working_dir: Option<PathBuf>,
    path_env: Option<OsString>,
    start_timeout: Duration,
    exec_timeout: Option<Duration>,
}

impl Invocation {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            path_env: None,
            start_timeout: DEFAULT_START_TIMEOUT,
            exec_timeout: None,
        }
    }

    /// Invocation of the configured tool with its working directory and PATH.
    pub fn for_tool<I, S>(config: &SupervisorConfig, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut invocation = Self::new(config.tool.program())
            .args(args)
            .with_start_timeout(config.timeouts.start_timeout());
        invocation.working_dir = config.tool.working_dir.clone();
        invocation.path_env = config.tool.child_path();
        invocation
    }

    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn with_start_timeout(mut self, timeout: Duration) -> Self {
        self.start_timeout = timeout;
        self
    }

    pub fn with_exec_timeout(mut self, timeout: Duration) -> Self {
        self.exec_timeout = Some(timeout);
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn path_env(&self) -> Option<&OsStr> {
        self.path_env.as_deref()
    }

    pub fn start_timeout(&self) -> Duration {
        self.start_timeout
    }

    pub fn exec_timeout(&self) -> Option<Duration> {
        self.exec_timeout
    }

    /// Human-readable command line, e.g. `netter parse --path /tmp/a.rd`.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
