mod process_command;
mod process_monitor;

pub use process_command::ProcessCommand;
pub(crate) use process_monitor::ProcessMonitor;
