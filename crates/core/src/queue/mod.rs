//! Sequential job queue for file conversions.

#[allow(clippy::module_inception)]
mod queue;
mod types;

pub use queue::ConversionQueue;
pub use types::{Job, JobStatus, QueueError, QueueEvent, RunSummary};
