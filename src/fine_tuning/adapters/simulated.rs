//! Deterministic in-memory training provider.
//!
//! Every submitted job advances through a fixed progress schedule on
//! each status poll and succeeds with the same final metrics, so tests
//! and local runs can drive the pipeline end to end without a real
//! provider.

use async_trait::async_trait;
use camino::Utf8Path;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::fine_tuning::{
    domain::TrainingMetrics,
    ports::{
        TrainingProvider, TrainingProviderError, TrainingProviderResult, TrainingState,
        TrainingStatusReport,
    },
};

/// Progress gained per status poll.
const PROGRESS_STEP: f64 = 0.25;

/// Training provider that advances a fixed schedule in memory.
#[derive(Debug, Clone, Default)]
pub struct SimulatedTrainingProvider {
    progress: Arc<RwLock<HashMap<String, f64>>>,
}

impl SimulatedTrainingProvider {
    /// Creates a provider with no submitted jobs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Metrics every simulated run finishes with.
    #[must_use]
    pub const fn final_metrics() -> TrainingMetrics {
        TrainingMetrics {
            final_loss: 0.042,
            trained_steps: 1000,
            epochs: 3,
        }
    }
}

#[async_trait]
impl TrainingProvider for SimulatedTrainingProvider {
    async fn submit(
        &self,
        _dataset_path: &Utf8Path,
        _base_model: &str,
        _target_model_name: &str,
    ) -> TrainingProviderResult<String> {
        let external_job_id = format!("sim-{}", Uuid::new_v4().simple());
        let mut progress = self.progress.write().map_err(|err| {
            TrainingProviderError::provider(std::io::Error::other(err.to_string()))
        })?;
        progress.insert(external_job_id.clone(), 0.0);
        Ok(external_job_id)
    }

    async fn get_status(
        &self,
        external_job_id: &str,
    ) -> TrainingProviderResult<TrainingStatusReport> {
        let mut progress = self.progress.write().map_err(|err| {
            TrainingProviderError::provider(std::io::Error::other(err.to_string()))
        })?;
        let Some(current) = progress.get_mut(external_job_id) else {
            return Err(TrainingProviderError::UnknownExternalJob(
                external_job_id.to_owned(),
            ));
        };
        *current = (*current + PROGRESS_STEP).min(1.0);
        let state = if *current >= 1.0 {
            TrainingState::Succeeded(Self::final_metrics())
        } else {
            TrainingState::InProgress
        };
        Ok(TrainingStatusReport {
            progress: *current,
            state,
        })
    }
}
