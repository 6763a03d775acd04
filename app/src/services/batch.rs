//! Batch job orchestration.
//!
//! At most one job runs at a time on a blocking worker thread. Progress is
//! appended to an in-memory job log and broadcast to websocket clients.

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use qr_batch::{
    BatchError, BatchEvent, BatchItem, BatchSummary, CancelFlag, ItemRenderer, plan_items,
    run_batch,
};
use qr_render::QrRenderError;
use serde::Serialize;
use serde_json::json;
use tokio::sync::broadcast;

use crate::config::AppConfig;
use crate::services::font::FontService;

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("A batch job is already running")]
    AlreadyRunning,
    #[error("Output folder is not set")]
    OutputDirNotSet,
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error(transparent)]
    Render(#[from] QrRenderError),
    #[error("Batch worker failed: {0}")]
    Worker(String),
}

/// Items, destination and renderer for one run.
pub struct PreparedJob {
    pub items: Vec<BatchItem>,
    pub out_dir: PathBuf,
    pub renderer: ItemRenderer,
}

/// Check the output folder, read the source and build the renderer.
pub fn prepare_job(config: &AppConfig, fonts: &FontService) -> Result<PreparedJob, JobError> {
    let out_dir = config.output_dir.clone().ok_or(JobError::OutputDirNotSet)?;
    if !out_dir.is_dir() {
        return Err(BatchError::OutputDirMissing(out_dir.display().to_string()).into());
    }

    let values = config.source().resolve()?;
    let items = plan_items(&values, &config.naming());
    warn_duplicate_names(&items);

    let mut renderer = ItemRenderer::new(
        config.label_style(),
        config.format,
        fonts.resolve_font_data(config),
        None,
    );
    if let Some(bg) = &config.background_image {
        renderer = renderer.with_background_file(bg)?;
    }

    Ok(PreparedJob {
        items,
        out_dir,
        renderer,
    })
}

/// Run a prepared job on the current thread.
pub fn execute_job(
    job: &PreparedJob,
    cancel: &CancelFlag,
    on_event: impl FnMut(BatchEvent),
) -> Result<BatchSummary, JobError> {
    let summary = run_batch(
        &job.items,
        &job.out_dir,
        |content, path| job.renderer.render_to(content, path),
        cancel,
        on_event,
    )?;
    Ok(summary)
}

fn warn_duplicate_names(items: &[BatchItem]) {
    let mut seen = HashSet::new();
    let duplicates = items
        .iter()
        .filter(|item| item.content.is_some() && !seen.insert(item.file_name.as_str()))
        .count();
    if duplicates > 0 {
        tracing::warn!(duplicates, "Some file names repeat; later items overwrite earlier ones");
    }
}

/// Lines kept in the job log; older lines are dropped first.
pub const MAX_JOB_LOG_LINES: usize = 500;

/// Snapshot of the current or last job.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobStatus {
    pub running: bool,
    pub job_id: Option<String>,
    pub summary: Option<BatchSummary>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "VecDeque::is_empty")]
    pub log: VecDeque<String>,
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
}

impl JobStatus {
    fn push_log(&mut self, line: String) {
        if self.log.len() == MAX_JOB_LOG_LINES {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }

    /// The status without its log, for broadcasts. Clients already saw
    /// every line as a `batch_event`.
    pub fn without_log(&self) -> JobStatus {
        JobStatus {
            log: VecDeque::new(),
            summary: self.summary.clone(),
            job_id: self.job_id.clone(),
            error: self.error.clone(),
            started_at: self.started_at.clone(),
            finished_at: self.finished_at.clone(),
            running: self.running,
        }
    }
}

#[derive(Default)]
struct JobState {
    status: JobStatus,
    cancel: CancelFlag,
}

/// Single-job runner shared between API handlers.
#[derive(Clone, Default)]
pub struct BatchService {
    inner: Arc<Mutex<JobState>>,
}

impl BatchService {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, JobState> {
        // A panic while holding the lock leaves only status data behind.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a job on a blocking worker. Returns the new job id.
    pub fn start(
        &self,
        config: AppConfig,
        fonts: FontService,
        events: broadcast::Sender<String>,
    ) -> Result<String, JobError> {
        let job_id = uuid::Uuid::new_v4().to_string();
        let cancel = CancelFlag::new();
        {
            let mut state = self.lock();
            if state.status.running {
                return Err(JobError::AlreadyRunning);
            }
            let out_dir = config.output_dir.as_ref().ok_or(JobError::OutputDirNotSet)?;
            if !out_dir.is_dir() {
                return Err(BatchError::OutputDirMissing(out_dir.display().to_string()).into());
            }
            state.cancel = cancel.clone();
            state.status = JobStatus {
                running: true,
                job_id: Some(job_id.clone()),
                started_at: Some(chrono::Utc::now().to_rfc3339()),
                ..JobStatus::default()
            };
        }

        tracing::info!(job_id = %job_id, "Batch job started");
        let service = self.clone();
        let id = job_id.clone();
        let worker = tokio::task::spawn_blocking(move || {
            let result = prepare_job(&config, &fonts)
                .and_then(|job| execute_job(&job, &cancel, |e| service.record(&id, &events, e)));
            service.finish(&id, &events, result);
        });

        // Surface worker panics instead of leaving the job marked running.
        let service = self.clone();
        let id = job_id.clone();
        tokio::spawn(async move {
            if let Err(e) = worker.await {
                tracing::error!(job_id = %id, error = %e, "Batch worker panicked");
                let mut state = service.lock();
                state.status.running = false;
                state.status.error = Some(JobError::Worker(e.to_string()).to_string());
                state.status.finished_at = Some(chrono::Utc::now().to_rfc3339());
            }
        });

        Ok(job_id)
    }

    /// Ask the running job to stop after its current item.
    pub fn cancel(&self) -> bool {
        let state = self.lock();
        if state.status.running {
            state.cancel.cancel();
            tracing::info!("Batch job cancellation requested");
            true
        } else {
            false
        }
    }

    pub fn status(&self) -> JobStatus {
        self.lock().status.clone()
    }

    pub fn is_running(&self) -> bool {
        self.lock().status.running
    }

    fn record(&self, job_id: &str, events: &broadcast::Sender<String>, event: BatchEvent) {
        let line = event.log_line();
        self.lock().status.push_log(line.clone());
        let msg = json!({
            "type": "batch_event",
            "data": {
                "job_id": job_id,
                "event": event,
                "message": line,
            }
        });
        let _ = events.send(msg.to_string());
    }

    fn finish(
        &self,
        job_id: &str,
        events: &broadcast::Sender<String>,
        result: Result<BatchSummary, JobError>,
    ) {
        let msg = {
            let mut state = self.lock();
            state.status.running = false;
            state.status.finished_at = Some(chrono::Utc::now().to_rfc3339());
            match result {
                Ok(summary) => {
                    tracing::info!(
                        job_id,
                        generated = summary.generated,
                        failed = summary.failed,
                        cancelled = summary.cancelled,
                        "Batch job finished"
                    );
                    state.status.summary = Some(summary);
                }
                Err(e) => {
                    tracing::error!(job_id, error = %e, "Batch job failed");
                    state.status.push_log(format!("Error: {e}"));
                    state.status.error = Some(e.to_string());
                }
            }
            json!({ "type": "batch_finished", "data": state.status.without_log() })
        };
        let _ = events.send(msg.to_string());
    }
}
