//! Sequential conversion queue.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use chrono::Utc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::catalog::Format;
use crate::converter::{Dispatch, ProgressSink, SourceFile};
use crate::history::{HistoryEntry, HistoryStore};
use crate::metrics;

use super::types::{Job, JobStatus, QueueError, QueueEvent, RunSummary};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// FIFO queue of conversion jobs, processed one at a time.
///
/// Jobs are owned by the queue and mutated only through it. `run` is
/// re-entrancy safe: a second call while a run is in progress is a
/// no-op that reports `started == false`.
pub struct ConversionQueue<D: Dispatch> {
    dispatch: D,
    jobs: Arc<RwLock<Vec<Job>>>,
    running: AtomicBool,
    events: broadcast::Sender<QueueEvent>,
    history: Arc<HistoryStore>,
    output_dir: PathBuf,
}

impl<D: Dispatch> ConversionQueue<D> {
    pub fn new(dispatch: D, history: Arc<HistoryStore>, output_dir: impl Into<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            dispatch,
            jobs: Arc::new(RwLock::new(Vec::new())),
            running: AtomicBool::new(false),
            events,
            history,
            output_dir: output_dir.into(),
        }
    }

    /// Add a job at the back of the queue.
    pub fn enqueue(&self, file: SourceFile, target_format: Format) -> Job {
        let job = Job::new(file, target_format);
        let snapshot = job.clone();

        {
            let mut jobs = self.jobs.write().unwrap();
            jobs.push(job);
            metrics::QUEUE_LENGTH.set(jobs.len() as i64);
        }
        metrics::JOBS_ENQUEUED.inc();

        let _ = self.events.send(QueueEvent::JobQueued {
            id: snapshot.id,
            file_name: snapshot.file.name.clone(),
            target_format: snapshot.target_format,
        });

        snapshot
    }

    /// Snapshot of all jobs in queue order.
    pub fn jobs(&self) -> Vec<Job> {
        self.jobs.read().unwrap().clone()
    }

    pub fn job(&self, id: Uuid) -> Option<Job> {
        self.jobs.read().unwrap().iter().find(|j| j.id == id).cloned()
    }

    /// Remove a single waiting job. Refused while a run is in progress
    /// and for jobs past the waiting state.
    pub fn remove(&self, id: Uuid) -> Result<(), QueueError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(QueueError::RunInProgress);
        }

        {
            let mut jobs = self.jobs.write().unwrap();
            let index = jobs
                .iter()
                .position(|j| j.id == id)
                .ok_or(QueueError::NotFound { id })?;
            if jobs[index].status != JobStatus::Waiting {
                return Err(QueueError::NotWaiting { id });
            }
            jobs.remove(index);
            metrics::QUEUE_LENGTH.set(jobs.len() as i64);
        }

        let _ = self.events.send(QueueEvent::JobRemoved { id });
        Ok(())
    }

    /// Remove all jobs. Refused while a run is in progress.
    pub fn clear(&self) -> Result<(), QueueError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(QueueError::RunInProgress);
        }

        {
            let mut jobs = self.jobs.write().unwrap();
            jobs.clear();
            metrics::QUEUE_LENGTH.set(0);
        }

        let _ = self.events.send(QueueEvent::QueueCleared);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Subscribe to queue change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.events.subscribe()
    }

    /// Process every job that was waiting when the call was made, in
    /// queue order. Jobs enqueued after the call wait for the next run.
    /// A failing job never stops the run.
    pub async fn run(&self) -> RunSummary {
        if self.running.swap(true, Ordering::SeqCst) {
            metrics::QUEUE_RUNS
                .with_label_values(&["already_running"])
                .inc();
            return RunSummary::not_started();
        }
        metrics::QUEUE_RUNS.with_label_values(&["started"]).inc();

        let pending: Vec<Uuid> = self
            .jobs
            .read()
            .unwrap()
            .iter()
            .filter(|j| j.status == JobStatus::Waiting)
            .map(|j| j.id)
            .collect();

        let mut completed = 0;
        let mut failed = 0;

        for id in pending {
            let Some((file, target)) = self.begin(id) else {
                continue;
            };

            tracing::info!(job_id = %id, file = %file.name, target = %target, "processing job");

            let progress = self.progress_sink(id);
            let outcome = self.dispatch.convert(&file, target, &progress).await;

            if outcome.success {
                match self.store_output(id, &outcome.filename, outcome.data.as_deref().unwrap_or_default()).await {
                    Ok(download_path) => {
                        self.complete(id, &file, target, &outcome, download_path);
                        completed += 1;
                    }
                    Err(e) => {
                        tracing::warn!(job_id = %id, error = %e, "failed to store converted file");
                        self.fail(id, format!("failed to store converted file: {}", e));
                        failed += 1;
                    }
                }
            } else {
                let error = outcome
                    .error
                    .unwrap_or_else(|| "conversion failed".to_string());
                self.fail(id, error);
                failed += 1;
            }
        }

        self.running.store(false, Ordering::SeqCst);
        let _ = self.events.send(QueueEvent::RunFinished { completed, failed });

        RunSummary {
            started: true,
            completed,
            failed,
        }
    }

    /// Move a waiting job to processing and hand back what the dispatcher
    /// needs. All job mutation funnels through this and the finish
    /// helpers below.
    fn begin(&self, id: Uuid) -> Option<(SourceFile, Format)> {
        let mut jobs = self.jobs.write().unwrap();
        let job = jobs
            .iter_mut()
            .find(|j| j.id == id && j.status == JobStatus::Waiting)?;
        job.status = JobStatus::Processing;
        drop(jobs);

        let _ = self.events.send(QueueEvent::JobStarted { id });
        self.job(id).map(|j| (j.file, j.target_format))
    }

    fn complete(
        &self,
        id: Uuid,
        file: &SourceFile,
        target: Format,
        outcome: &crate::converter::ConversionOutcome,
        download_path: String,
    ) {
        {
            let mut jobs = self.jobs.write().unwrap();
            if let Some(job) = jobs.iter_mut().find(|j| j.id == id) {
                job.status = JobStatus::Completed;
                job.progress = 100;
                job.error = None;
                job.download_path = Some(download_path.clone());
            }
        }

        if let Some(source_format) = file.format() {
            self.history.append(HistoryEntry {
                id,
                file_name: file.name.clone(),
                source_format,
                target_format: target,
                size_bytes: file.size_bytes(),
                completed_at: Utc::now(),
                download_path: download_path.clone(),
                converted_file_name: outcome.filename.clone(),
            });
        }

        let _ = self.events.send(QueueEvent::JobCompleted { id, download_path });
    }

    fn fail(&self, id: Uuid, error: String) {
        {
            let mut jobs = self.jobs.write().unwrap();
            if let Some(job) = jobs.iter_mut().find(|j| j.id == id) {
                job.status = JobStatus::Failed;
                job.progress = 0;
                job.error = Some(error.clone());
            }
        }

        let _ = self.events.send(QueueEvent::JobFailed { id, error });
    }

    fn progress_sink(&self, id: Uuid) -> ProgressSink {
        let jobs = Arc::clone(&self.jobs);
        let events = self.events.clone();
        ProgressSink::new(move |progress| {
            {
                let mut jobs = jobs.write().unwrap();
                if let Some(job) = jobs
                    .iter_mut()
                    .find(|j| j.id == id && j.status == JobStatus::Processing)
                {
                    job.progress = progress;
                }
            }
            let _ = events.send(QueueEvent::JobProgress { id, progress });
        })
    }

    async fn store_output(
        &self,
        id: Uuid,
        filename: &str,
        data: &[u8],
    ) -> Result<String, std::io::Error> {
        let dir = self.output_dir.join(id.to_string());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(filename), data).await?;
        Ok(format!("/downloads/{}/{}", id, filename))
    }
}
