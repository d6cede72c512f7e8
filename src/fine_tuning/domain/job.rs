//! Fine-tuning job aggregate root and job state machine.

use super::{FineTuningDomainError, JobId, ParseFineTuningStatusError};
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metadata key recording the latest provider-reported progress fraction.
pub const METADATA_PROGRESS: &str = "progress";

/// Metadata key recording why a pipeline start was deferred.
pub const METADATA_DEFERRED_REASON: &str = "deferred_reason";

/// Metadata key recording the provider-reported failure reason.
pub const METADATA_FAILURE_REASON: &str = "failure_reason";

/// Fine-tuning job lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FineTuningStatus {
    /// Job exists but has not been submitted to a provider.
    Pending,
    /// Job is queued at the provider.
    Queued,
    /// Job is training at the provider.
    Running,
    /// Training finished successfully.
    Completed,
    /// Training finished unsuccessfully.
    Failed,
}

impl FineTuningStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns whether this status is final.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns whether transition to `target` is allowed.
    ///
    /// The machine is strictly monotonic: no transition ever moves a job
    /// back towards `Pending`, and terminal states admit none.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Queued | Self::Running)
                | (Self::Queued, Self::Running | Self::Completed | Self::Failed)
                | (Self::Running, Self::Completed | Self::Failed)
        )
    }
}

impl fmt::Display for FineTuningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for FineTuningStatus {
    type Error = ParseFineTuningStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "queued" => Ok(Self::Queued),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseFineTuningStatusError(value.to_owned())),
        }
    }
}

/// Final training measurements reported by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Loss at the end of training.
    pub final_loss: f64,
    /// Number of optimizer steps executed.
    pub trained_steps: u64,
    /// Number of passes over the dataset.
    pub epochs: u32,
}

/// Fine-tuning job aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FineTuningJob {
    id: JobId,
    base_model: String,
    target_model_name: String,
    status: FineTuningStatus,
    dataset_path: Option<Utf8PathBuf>,
    external_job_id: Option<String>,
    metrics: Option<TrainingMetrics>,
    metadata: BTreeMap<String, String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Construction parameters for a new fine-tuning job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobParams {
    /// Model the training run starts from.
    pub base_model: String,
    /// Name the tuned model will be published under.
    pub target_model_name: String,
}

/// Parameter object for reconstructing a persisted job.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedJobData {
    /// Persisted job identifier.
    pub id: JobId,
    /// Persisted base model.
    pub base_model: String,
    /// Persisted target model name.
    pub target_model_name: String,
    /// Persisted lifecycle status.
    pub status: FineTuningStatus,
    /// Persisted dataset path, if curated.
    pub dataset_path: Option<Utf8PathBuf>,
    /// Persisted provider job reference, if submitted.
    pub external_job_id: Option<String>,
    /// Persisted final metrics, if completed.
    pub metrics: Option<TrainingMetrics>,
    /// Persisted free-form annotations.
    pub metadata: BTreeMap<String, String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl FineTuningJob {
    /// Creates a new job in [`FineTuningStatus::Pending`].
    ///
    /// # Errors
    ///
    /// Returns [`FineTuningDomainError`] when the base model or target
    /// model name is empty after trimming.
    pub fn new(params: NewJobParams, clock: &impl Clock) -> Result<Self, FineTuningDomainError> {
        let base_model = params.base_model.trim().to_owned();
        if base_model.is_empty() {
            return Err(FineTuningDomainError::EmptyBaseModel);
        }
        let target_model_name = params.target_model_name.trim().to_owned();
        if target_model_name.is_empty() {
            return Err(FineTuningDomainError::EmptyTargetModelName);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: JobId::new(),
            base_model,
            target_model_name,
            status: FineTuningStatus::Pending,
            dataset_path: None,
            external_job_id: None,
            metrics: None,
            metadata: BTreeMap::new(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a job from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedJobData) -> Self {
        Self {
            id: data.id,
            base_model: data.base_model,
            target_model_name: data.target_model_name,
            status: data.status,
            dataset_path: data.dataset_path,
            external_job_id: data.external_job_id,
            metrics: data.metrics,
            metadata: data.metadata,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the job identifier.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Returns the model the training run starts from.
    #[must_use]
    pub fn base_model(&self) -> &str {
        &self.base_model
    }

    /// Returns the name the tuned model will be published under.
    #[must_use]
    pub fn target_model_name(&self) -> &str {
        &self.target_model_name
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> FineTuningStatus {
        self.status
    }

    /// Returns the curated dataset path, if any.
    #[must_use]
    pub fn dataset_path(&self) -> Option<&Utf8PathBuf> {
        self.dataset_path.as_ref()
    }

    /// Returns the provider job reference, if submitted.
    #[must_use]
    pub fn external_job_id(&self) -> Option<&str> {
        self.external_job_id.as_deref()
    }

    /// Returns the final training metrics, if completed.
    #[must_use]
    pub const fn metrics(&self) -> Option<&TrainingMetrics> {
        self.metrics.as_ref()
    }

    /// Returns the free-form annotations.
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Records submission to a provider and moves the job to
    /// [`FineTuningStatus::Running`].
    ///
    /// # Errors
    ///
    /// Returns [`FineTuningDomainError::ExternalJobIdAlreadySet`] when the
    /// provider reference was already recorded, or
    /// [`FineTuningDomainError::InvalidFineTuningTransition`] when the job
    /// is not in a submittable state; the job is left unchanged either
    /// way.
    pub fn record_submission(
        &mut self,
        external_job_id: impl Into<String>,
        dataset_path: Utf8PathBuf,
        clock: &impl Clock,
    ) -> Result<(), FineTuningDomainError> {
        if self.external_job_id.is_some() {
            return Err(FineTuningDomainError::ExternalJobIdAlreadySet(self.id));
        }
        self.apply_transition(FineTuningStatus::Running, clock)?;
        self.external_job_id = Some(external_job_id.into());
        self.dataset_path = Some(dataset_path);
        Ok(())
    }

    /// Records why a pipeline start was deferred; the job stays pending.
    pub fn defer(&mut self, reason: impl Into<String>, clock: &impl Clock) {
        self.metadata
            .insert(METADATA_DEFERRED_REASON.to_owned(), reason.into());
        self.touch(clock);
    }

    /// Records a provider-reported progress fraction.
    pub fn record_progress(&mut self, progress: f64, clock: &impl Clock) {
        self.metadata
            .insert(METADATA_PROGRESS.to_owned(), format!("{progress:.2}"));
        self.touch(clock);
    }

    /// Moves the job to [`FineTuningStatus::Completed`] with its final
    /// metrics.
    ///
    /// # Errors
    ///
    /// Returns [`FineTuningDomainError::InvalidFineTuningTransition`] when
    /// completion is not reachable from the current status.
    pub fn complete(
        &mut self,
        metrics: TrainingMetrics,
        clock: &impl Clock,
    ) -> Result<(), FineTuningDomainError> {
        self.apply_transition(FineTuningStatus::Completed, clock)?;
        self.metrics = Some(metrics);
        Ok(())
    }

    /// Moves the job to [`FineTuningStatus::Failed`] with the provider's
    /// reason.
    ///
    /// # Errors
    ///
    /// Returns [`FineTuningDomainError::InvalidFineTuningTransition`] when
    /// failure is not reachable from the current status.
    pub fn fail(
        &mut self,
        reason: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), FineTuningDomainError> {
        self.apply_transition(FineTuningStatus::Failed, clock)?;
        self.metadata
            .insert(METADATA_FAILURE_REASON.to_owned(), reason.into());
        Ok(())
    }

    /// Applies a validated state transition.
    ///
    /// # Errors
    ///
    /// Returns [`FineTuningDomainError::InvalidFineTuningTransition`] when
    /// the target is not reachable from the current status; the job is
    /// left unchanged.
    pub fn transition_to(
        &mut self,
        target: FineTuningStatus,
        clock: &impl Clock,
    ) -> Result<(), FineTuningDomainError> {
        self.apply_transition(target, clock)
    }

    fn apply_transition(
        &mut self,
        target: FineTuningStatus,
        clock: &impl Clock,
    ) -> Result<(), FineTuningDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(FineTuningDomainError::InvalidFineTuningTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
