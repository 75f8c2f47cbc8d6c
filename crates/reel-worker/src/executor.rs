//! Job state controller.

use std::sync::Arc;

use reel_media::ProcessRunner;
use reel_models::{JobId, JobUpdate};
use reel_records::JobStore;
use reel_storage::{ObjectStore, PublicUrlResolver};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::JobLogger;
use crate::pipeline::{run_pipeline, PipelineContext};
use crate::staging::StagingArea;

/// Drives one job through `queued → processing → completed | failed`.
///
/// The record store's status field is the single durable signal of outcome;
/// whatever this controller persists is what callers observe.
pub struct JobExecutor {
    records: Arc<dyn JobStore>,
    pipeline: PipelineContext,
    config: WorkerConfig,
}

impl JobExecutor {
    /// Create an executor from its collaborators.
    pub fn new(
        config: WorkerConfig,
        records: Arc<dyn JobStore>,
        storage: Arc<dyn ObjectStore>,
        runner: Arc<dyn ProcessRunner>,
        urls: PublicUrlResolver,
    ) -> Self {
        let pipeline = PipelineContext {
            storage,
            runner,
            urls,
            encoding: config.encoding.clone(),
        };
        Self {
            records,
            pipeline,
            config,
        }
    }

    /// Run one job to completion.
    ///
    /// A missing record fails fast before any status write or staging
    /// directory exists. After a fatal pipeline error the `failed` status is
    /// written best-effort and the original error is re-raised, so the
    /// invocation still reports failure even though the record was updated.
    /// The staging area is released on every exit path.
    pub async fn execute(&self, job_id: &JobId) -> WorkerResult<()> {
        let logger = JobLogger::new(job_id);
        logger.log_start("loading job record");

        let job = self.records.load_job(job_id).await.map_err(|e| {
            if e.is_not_found() {
                WorkerError::JobNotFound(job_id.to_string())
            } else {
                WorkerError::Records(e)
            }
        })?;

        if job.status.is_terminal() {
            logger.log_warning(&format!("job already {}, reprocessing", job.status));
        }

        self.records
            .update_job(job_id, &JobUpdate::processing())
            .await?;

        let mut staging = match StagingArea::acquire(&self.config.work_dir, job_id).await {
            Ok(staging) => staging,
            Err(e) => {
                let err = WorkerError::Io(e);
                logger.log_error(&err.to_string());
                self.persist_failure(job_id, &logger, &err).await;
                return Err(err);
            }
        };

        let result = run_pipeline(&self.pipeline, &job, &staging, &logger).await;

        let outcome = match result {
            Ok(outcome) => {
                let update =
                    JobUpdate::completed(outcome.video_url.clone(), outcome.thumbnail_url.clone());
                match self.records.update_job(job_id, &update).await {
                    Ok(()) => {
                        logger.log_completion(&outcome.video_url);
                        Ok(())
                    }
                    Err(e) => {
                        // The work succeeded but the record still says
                        // `processing`; reconciliation is left to the caller.
                        logger.log_error(&format!("completed but status write failed: {}", e));
                        Err(WorkerError::Records(e))
                    }
                }
            }
            Err(err) => {
                logger.log_error(&err.to_string());
                self.persist_failure(job_id, &logger, &err).await;
                Err(err)
            }
        };

        staging.release().await;
        outcome
    }

    /// Best-effort `failed` status write. Its own failure is logged, never
    /// escalated, so the pipeline's real error is what the caller sees.
    async fn persist_failure(&self, job_id: &JobId, logger: &JobLogger, err: &WorkerError) {
        if let Err(write_err) = self
            .records
            .update_job(job_id, &JobUpdate::failed(err.to_string()))
            .await
        {
            logger.log_warning(&format!("failed to persist failure status: {}", write_err));
        }
    }
}
