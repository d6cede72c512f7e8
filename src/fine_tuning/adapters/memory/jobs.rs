//! Thread-safe in-memory fine-tuning job repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::fine_tuning::{
    domain::{FineTuningJob, FineTuningStatus, JobId},
    ports::{JobRepository, JobRepositoryError, JobRepositoryResult},
};

/// Thread-safe in-memory fine-tuning job repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobRepository {
    state: Arc<RwLock<HashMap<JobId, FineTuningJob>>>,
}

impl InMemoryJobRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn save(&self, job: &FineTuningJob) -> JobRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| JobRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        if state.contains_key(&job.id()) {
            return Err(JobRepositoryError::DuplicateJob(job.id()));
        }
        state.insert(job.id(), job.clone());
        Ok(())
    }

    async fn update(&self, job: &FineTuningJob) -> JobRepositoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| JobRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        if !state.contains_key(&job.id()) {
            return Err(JobRepositoryError::NotFound(job.id()));
        }
        state.insert(job.id(), job.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: JobId) -> JobRepositoryResult<Option<FineTuningJob>> {
        let state = self
            .state
            .read()
            .map_err(|err| JobRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state.get(&id).cloned())
    }

    async fn list_in_flight(&self) -> JobRepositoryResult<Vec<FineTuningJob>> {
        let state = self
            .state
            .read()
            .map_err(|err| JobRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
        let mut jobs: Vec<FineTuningJob> = state
            .values()
            .filter(|job| {
                matches!(
                    job.status(),
                    FineTuningStatus::Queued | FineTuningStatus::Running
                )
            })
            .cloned()
            .collect();
        jobs.sort_by_key(FineTuningJob::created_at);
        Ok(jobs)
    }
}
