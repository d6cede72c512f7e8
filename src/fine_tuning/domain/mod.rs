//! Domain types for the fine-tuning context.

mod error;
mod ids;
mod job;

pub use error::{FineTuningDomainError, ParseFineTuningStatusError};
pub use ids::JobId;
pub use job::{
    FineTuningJob, FineTuningStatus, METADATA_DEFERRED_REASON, METADATA_FAILURE_REASON,
    METADATA_PROGRESS, NewJobParams, PersistedJobData, TrainingMetrics,
};
