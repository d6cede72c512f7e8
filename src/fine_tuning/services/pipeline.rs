//! Fine-tuning pipeline orchestration: curation handoff, provider
//! submission, and the poll loop.

use camino::Utf8Path;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::fine_tuning::{
    domain::{FineTuningDomainError, FineTuningJob, FineTuningStatus, JobId, NewJobParams, TrainingMetrics},
    ports::{
        CurationError, DatasetCurator, JobRepository, JobRepositoryError, TrainingProvider,
        TrainingProviderError, TrainingState,
    },
    services::curator::DEFAULT_MIN_SUCCESS_RATE,
};

/// Service-level errors for fine-tuning pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The job identifier did not resolve.
    #[error("fine-tuning job not found: {0}")]
    JobNotFound(JobId),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] FineTuningDomainError),

    /// Job repository operation failed.
    #[error(transparent)]
    Repository(#[from] JobRepositoryError),

    /// Provider operation failed.
    #[error(transparent)]
    Provider(#[from] TrainingProviderError),

    /// Dataset curation failed.
    #[error(transparent)]
    Curation(#[from] CurationError),
}

/// Result type for fine-tuning pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Fine-tuning pipeline orchestration service.
#[derive(Clone)]
pub struct FineTuningPipeline<J, P, D, C>
where
    J: JobRepository,
    P: TrainingProvider,
    D: DatasetCurator,
    C: Clock + Send + Sync,
{
    jobs: Arc<J>,
    provider: Arc<P>,
    curator: Arc<D>,
    clock: Arc<C>,
}

impl<J, P, D, C> FineTuningPipeline<J, P, D, C>
where
    J: JobRepository,
    P: TrainingProvider,
    D: DatasetCurator,
    C: Clock + Send + Sync,
{
    /// Creates a new fine-tuning pipeline service.
    #[must_use]
    pub const fn new(jobs: Arc<J>, provider: Arc<P>, curator: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            jobs,
            provider,
            curator,
            clock,
        }
    }

    /// Creates and persists a new pending job.
    ///
    /// # Errors
    ///
    /// Returns [`FineTuningDomainError`] (wrapped) when the model names
    /// are invalid, or a repository error when persistence fails.
    pub async fn create_job(
        &self,
        base_model: impl Into<String>,
        target_model_name: impl Into<String>,
    ) -> PipelineResult<FineTuningJob> {
        let job = FineTuningJob::new(
            NewJobParams {
                base_model: base_model.into(),
                target_model_name: target_model_name.into(),
            },
            &*self.clock,
        )?;
        self.jobs.save(&job).await?;
        Ok(job)
    }

    /// Curates a dataset and submits the job for training.
    ///
    /// When no completed session meets the curation threshold the job
    /// stays pending with the reason recorded in its metadata; otherwise
    /// the dataset path and the provider's job reference are recorded
    /// and the job moves to [`FineTuningStatus::Running`].
    ///
    /// Only a pending, never-submitted job may start; anything else is
    /// rejected before the curator writes a file or the provider sees a
    /// submission.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::JobNotFound`] when the job does not
    /// resolve, [`FineTuningDomainError::ExternalJobIdAlreadySet`]
    /// (wrapped) when the job was already submitted,
    /// [`FineTuningDomainError::InvalidFineTuningTransition`] (wrapped)
    /// when the job has left [`FineTuningStatus::Pending`], or
    /// curation/provider/repository errors.
    pub async fn start_pipeline(
        &self,
        job_id: JobId,
        output_dir: &Utf8Path,
    ) -> PipelineResult<FineTuningJob> {
        let mut job = self.find_job_or_error(job_id).await?;
        if job.external_job_id().is_some() {
            return Err(FineTuningDomainError::ExternalJobIdAlreadySet(job.id()).into());
        }
        if job.status() != FineTuningStatus::Pending {
            return Err(FineTuningDomainError::InvalidFineTuningTransition {
                from: job.status(),
                to: FineTuningStatus::Running,
            }
            .into());
        }

        let Some(dataset_path) = self
            .curator
            .curate(output_dir, DEFAULT_MIN_SUCCESS_RATE)
            .await?
        else {
            debug!(job_id = %job_id, "no qualifying sessions; deferring pipeline start");
            job.defer("no completed sessions met the curation threshold", &*self.clock);
            self.jobs.update(&job).await?;
            return Ok(job);
        };

        let external_job_id = self
            .provider
            .submit(&dataset_path, job.base_model(), job.target_model_name())
            .await?;
        job.record_submission(external_job_id, dataset_path, &*self.clock)?;
        self.jobs.update(&job).await?;
        Ok(job)
    }

    /// Polls the provider for every in-flight job and applies the
    /// reported outcome.
    ///
    /// Per-job failures are logged and skipped so one broken job cannot
    /// stall the rest. Returns the number of jobs updated.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Repository`] only when the in-flight
    /// listing itself fails.
    pub async fn poll_jobs(&self) -> PipelineResult<usize> {
        let in_flight = self.jobs.list_in_flight().await?;
        let mut updated = 0;
        for job in in_flight {
            let Some(external_job_id) = job.external_job_id().map(str::to_owned) else {
                warn!(job_id = %job.id(), "in-flight job has no provider reference");
                continue;
            };
            match self.poll_one(job, &external_job_id).await {
                Ok(()) => updated += 1,
                Err(error) => {
                    warn!(%error, "skipping job during poll");
                }
            }
        }
        Ok(updated)
    }

    /// Completes a running job synchronously with caller-supplied
    /// metrics.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::JobNotFound`] when the job does not
    /// resolve, or
    /// [`FineTuningDomainError::InvalidFineTuningTransition`] (wrapped)
    /// when the job is not running.
    pub async fn update_job_progress(
        &self,
        job_id: JobId,
        metrics: TrainingMetrics,
    ) -> PipelineResult<FineTuningJob> {
        let mut job = self.find_job_or_error(job_id).await?;
        if job.status() != FineTuningStatus::Running {
            return Err(FineTuningDomainError::InvalidFineTuningTransition {
                from: job.status(),
                to: FineTuningStatus::Completed,
            }
            .into());
        }
        job.complete(metrics, &*self.clock)?;
        self.jobs.update(&job).await?;
        Ok(job)
    }

    /// Finds a job by identifier.
    ///
    /// Returns `Ok(None)` when no job has the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Repository`] when persistence lookup
    /// fails.
    pub async fn find_job(&self, job_id: JobId) -> PipelineResult<Option<FineTuningJob>> {
        Ok(self.jobs.find_by_id(job_id).await?)
    }

    async fn find_job_or_error(&self, job_id: JobId) -> PipelineResult<FineTuningJob> {
        self.jobs
            .find_by_id(job_id)
            .await?
            .ok_or(PipelineError::JobNotFound(job_id))
    }

    /// Applies one provider status report to one job.
    async fn poll_one(&self, mut job: FineTuningJob, external_job_id: &str) -> PipelineResult<()> {
        let report = self.provider.get_status(external_job_id).await?;
        match report.state {
            TrainingState::InProgress => {
                if job.status() == FineTuningStatus::Queued {
                    job.transition_to(FineTuningStatus::Running, &*self.clock)?;
                }
                job.record_progress(report.progress, &*self.clock);
            }
            TrainingState::Succeeded(metrics) => {
                job.complete(metrics, &*self.clock)?;
            }
            TrainingState::Failed(reason) => {
                job.fail(reason, &*self.clock)?;
            }
        }
        self.jobs.update(&job).await?;
        Ok(())
    }
}
