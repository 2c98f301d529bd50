//! Supervision of the external `netter` tool.
//!
//! [`Supervisor`] keeps one long-running `netter parse` server alive and
//! reports its lifecycle as [`SupervisorEvent`]s; [`CommandRunner`] and
//! [`AvailabilityProber`] cover one-shot invocations.

mod error;
mod event_emitter;
mod invocation;
mod lifecycle;
mod lifecycle_state;
mod line_buffer;
mod monitor;
mod output_classifier;
mod process;
mod runner;
mod supervisor;
mod supervisor_event;

#[cfg(test)]
mod tests;

pub use error::{Result as SupervisorResult, SupervisorError};
pub use event_emitter::EventEmitter;
pub use invocation::Invocation;
pub use lifecycle_state::LifecycleState;
pub use line_buffer::LineBuffer;
pub use monitor::ProcessCommand;
pub use output_classifier::{OutputClassifier, parse_ready_marker};
pub use process::{ChunkReader, ProcessHandle, WaitOutcome};
pub use runner::{AvailabilityProber, CommandOutput, CommandRunner};
pub use supervisor::Supervisor;
pub use supervisor_event::{OutputStream, SupervisorEvent};
