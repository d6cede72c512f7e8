//! Port contract for external training providers.

use crate::fine_tuning::domain::TrainingMetrics;
use async_trait::async_trait;
use camino::Utf8Path;
use std::sync::Arc;
use thiserror::Error;

/// Result type for training provider operations.
pub type TrainingProviderResult<T> = Result<T, TrainingProviderError>;

/// Provider-reported training state.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingState {
    /// Training has not reached a verdict yet.
    InProgress,
    /// Training finished successfully with final measurements.
    Succeeded(TrainingMetrics),
    /// Training finished unsuccessfully with a reason.
    Failed(String),
}

/// Snapshot of a provider-side training job.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingStatusReport {
    /// Fraction of training completed, in `[0, 1]`.
    pub progress: f64,
    /// Current training state.
    pub state: TrainingState,
}

/// External training execution contract.
#[async_trait]
pub trait TrainingProvider: Send + Sync {
    /// Submits a curated dataset for training and returns the provider's
    /// job reference.
    ///
    /// # Errors
    ///
    /// Returns [`TrainingProviderError`] when the provider rejects the
    /// submission.
    async fn submit(
        &self,
        dataset_path: &Utf8Path,
        base_model: &str,
        target_model_name: &str,
    ) -> TrainingProviderResult<String>;

    /// Reports the current state of a submitted job.
    ///
    /// # Errors
    ///
    /// Returns [`TrainingProviderError::UnknownExternalJob`] when the
    /// reference is not recognized.
    async fn get_status(&self, external_job_id: &str) -> TrainingProviderResult<TrainingStatusReport>;
}

/// Errors returned by training provider implementations.
#[derive(Debug, Clone, Error)]
pub enum TrainingProviderError {
    /// The provider does not recognize the job reference.
    #[error("unknown external job: {0}")]
    UnknownExternalJob(String),

    /// Provider-side failure.
    #[error("provider error: {0}")]
    Provider(Arc<dyn std::error::Error + Send + Sync>),
}

impl TrainingProviderError {
    /// Wraps a provider-side error.
    pub fn provider(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Provider(Arc::new(err))
    }
}
