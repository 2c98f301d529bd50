/// Requests from the lifecycle controller to the exit watcher.
///
/// The watcher task owns the child, so signals are delivered through it
/// instead of sharing the handle behind a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessCommand {
    /// SIGTERM to the process group
    Terminate,
    /// SIGKILL to the process group
    Kill,
}
