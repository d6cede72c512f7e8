//! Error types for fine-tuning domain validation and parsing.

use super::ids::JobId;
use super::job::FineTuningStatus;
use thiserror::Error;

/// Errors returned while constructing or mutating fine-tuning domain
/// values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FineTuningDomainError {
    /// The base model identifier is empty after trimming.
    #[error("base model must not be empty")]
    EmptyBaseModel,

    /// The target model name is empty after trimming.
    #[error("target model name must not be empty")]
    EmptyTargetModelName,

    /// The requested job state change is not in the transition table.
    #[error("invalid fine-tuning transition from {from} to {to}")]
    InvalidFineTuningTransition {
        /// State the job is currently in.
        from: FineTuningStatus,
        /// State the caller requested.
        to: FineTuningStatus,
    },

    /// The provider job reference is write-once and was already set.
    #[error("external job id already set for job {0}")]
    ExternalJobIdAlreadySet(JobId),
}

/// Error returned while parsing fine-tuning status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown fine-tuning status: {0}")]
pub struct ParseFineTuningStatusError(pub String);
