//! Queue API handlers.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use holliday_core::{
    CompatibilityResolver, Format, Job, JobStatus, QueueError, RunSummary, SourceFile,
};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for queue job operations
#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub id: Uuid,
    pub file_name: String,
    pub size_bytes: u64,
    pub source_format: Option<Format>,
    pub target_format: Format,
    pub status: JobStatus,
    pub progress: u8,
    pub error: Option<String>,
    pub download_path: Option<String>,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            file_name: job.file.name.clone(),
            size_bytes: job.file.size_bytes(),
            source_format: job.file.format(),
            target_format: job.target_format,
            status: job.status,
            progress: job.progress,
            error: job.error,
            download_path: job.download_path,
        }
    }
}

/// Response for a multipart enqueue. One job per uploaded file.
#[derive(Debug, Serialize)]
pub struct EnqueueResponse {
    pub jobs: Vec<JobResponse>,
}

/// Response for listing queue jobs
#[derive(Debug, Serialize)]
pub struct ListJobsResponse {
    pub jobs: Vec<JobResponse>,
    pub running: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct QueueErrorResponse {
    pub error: String,
}

fn error_response(
    status: StatusCode,
    message: impl Into<String>,
) -> (StatusCode, Json<QueueErrorResponse>) {
    (
        status,
        Json(QueueErrorResponse {
            error: message.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Enqueue conversion jobs from a multipart upload with one or more
/// `file` parts and a `format` field. All files must share the target,
/// so the target must be in the resolver intersection for the batch.
pub async fn enqueue_jobs(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<EnqueueResponse>), (StatusCode, Json<QueueErrorResponse>)> {
    let mut files: Vec<SourceFile> = Vec::new();
    let mut format_token: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error_response(StatusCode::BAD_REQUEST, format!("invalid multipart: {}", e))
    })? {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let data = field.bytes().await.map_err(|e| {
                    error_response(
                        StatusCode::BAD_REQUEST,
                        format!("failed to read file field: {}", e),
                    )
                })?;
                files.push(SourceFile::new(name, data));
            }
            Some("format") => {
                let token = field.text().await.map_err(|e| {
                    error_response(
                        StatusCode::BAD_REQUEST,
                        format!("failed to read format field: {}", e),
                    )
                })?;
                format_token = Some(token);
            }
            _ => {}
        }
    }

    if files.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "missing 'file' field".to_string(),
        ));
    }
    let format_token = format_token.ok_or_else(|| {
        error_response(
            StatusCode::BAD_REQUEST,
            "missing 'format' field".to_string(),
        )
    })?;

    let target = Format::parse_token(&format_token).ok_or_else(|| {
        error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("unknown target format: {}", format_token),
        )
    })?;

    let compatible = CompatibilityResolver::resolve(files.iter().map(|f| f.name.as_str()));
    if !compatible.contains(&target) {
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        return Err(error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("{} cannot be converted to {}", names.join(", "), target),
        ));
    }

    let queue = state.queue();
    let jobs = files
        .into_iter()
        .map(|file| queue.enqueue(file, target).into())
        .collect();
    Ok((StatusCode::CREATED, Json(EnqueueResponse { jobs })))
}

/// List all jobs in queue order.
pub async fn list_jobs(State(state): State<Arc<AppState>>) -> Json<ListJobsResponse> {
    let queue = state.queue();
    Json(ListJobsResponse {
        jobs: queue.jobs().into_iter().map(JobResponse::from).collect(),
        running: queue.is_running(),
    })
}

/// Remove a single job.
pub async fn remove_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<QueueErrorResponse>)> {
    match state.queue().remove(id) {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e @ QueueError::NotFound { .. }) => {
            Err(error_response(StatusCode::NOT_FOUND, e.to_string()))
        }
        Err(e) => Err(error_response(StatusCode::CONFLICT, e.to_string())),
    }
}

/// Remove all jobs.
pub async fn clear_queue(
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, (StatusCode, Json<QueueErrorResponse>)> {
    match state.queue().clear() {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(error_response(StatusCode::CONFLICT, e.to_string())),
    }
}

/// Process every waiting job. Returns 409 when a run is already in
/// progress.
pub async fn run_queue(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RunSummary>, (StatusCode, Json<QueueErrorResponse>)> {
    let summary = state.queue().run().await;
    if !summary.started {
        return Err(error_response(
            StatusCode::CONFLICT,
            QueueError::RunInProgress.to_string(),
        ));
    }
    Ok(Json(summary))
}
