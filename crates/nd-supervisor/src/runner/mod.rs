mod availability_prober;
mod command_output;
mod command_runner;

pub use availability_prober::AvailabilityProber;
pub use command_output::CommandOutput;
pub use command_runner::CommandRunner;
