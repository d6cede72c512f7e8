//! Port contracts for the fine-tuning pipeline.
//!
//! Ports define infrastructure-agnostic interfaces used by the
//! fine-tuning services.

pub mod curator;
pub mod provider;
pub mod repository;

pub use curator::{CurationError, CurationResult, DatasetCurator};
pub use provider::{
    TrainingProvider, TrainingProviderError, TrainingProviderResult, TrainingState,
    TrainingStatusReport,
};
pub use repository::{JobRepository, JobRepositoryError, JobRepositoryResult};
