pub mod entry;
pub mod run;

pub use entry::LogEntry;
pub use run::{ExecutionRequest, ExecutionResult, RunMode, RunOutcome};
