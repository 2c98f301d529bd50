mod chunk_reader;
mod process_handle;
mod wait_outcome;

pub use chunk_reader::ChunkReader;
pub use process_handle::ProcessHandle;
pub use wait_outcome::WaitOutcome;
