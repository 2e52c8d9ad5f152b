//! Types for the conversion queue.

use serde::Serialize;
use uuid::Uuid;

use crate::catalog::Format;
use crate::converter::SourceFile;

/// Lifecycle state of a queued job.
///
/// `Waiting` and `Failed` jobs always report progress 0, `Completed`
/// jobs always report 100. Only `Processing` moves between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Waiting,
    Processing,
    Completed,
    Failed,
}

/// One queued conversion.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: Uuid,
    pub file: SourceFile,
    pub target_format: Format,
    pub status: JobStatus,
    pub progress: u8,
    pub error: Option<String>,
    /// Set once the job completes and its output is written to disk.
    pub download_path: Option<String>,
}

impl Job {
    pub(crate) fn new(file: SourceFile, target_format: Format) -> Self {
        Self {
            id: Uuid::new_v4(),
            file,
            target_format,
            status: JobStatus::Waiting,
            progress: 0,
            error: None,
            download_path: None,
        }
    }
}

/// Outcome of a [`run`](super::ConversionQueue::run) invocation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RunSummary {
    /// False when another run was already in progress.
    pub started: bool,
    pub completed: usize,
    pub failed: usize,
}

impl RunSummary {
    pub(crate) fn not_started() -> Self {
        Self {
            started: false,
            completed: 0,
            failed: 0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("a queue run is already in progress")]
    RunInProgress,

    #[error("job not found: {id}")]
    NotFound { id: Uuid },

    #[error("only waiting jobs can be removed: {id}")]
    NotWaiting { id: Uuid },
}

/// Change notification emitted by the queue.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueueEvent {
    JobQueued {
        id: Uuid,
        file_name: String,
        target_format: Format,
    },
    JobStarted {
        id: Uuid,
    },
    JobProgress {
        id: Uuid,
        progress: u8,
    },
    JobCompleted {
        id: Uuid,
        download_path: String,
    },
    JobFailed {
        id: Uuid,
        error: String,
    },
    JobRemoved {
        id: Uuid,
    },
    QueueCleared,
    RunFinished {
        completed: usize,
        failed: usize,
    },
}
