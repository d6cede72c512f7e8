//! Application services for the fine-tuning pipeline.

mod curator;
mod pipeline;

pub use curator::{DEFAULT_MIN_SUCCESS_RATE, SessionDatasetCurator};
pub use pipeline::{FineTuningPipeline, PipelineError, PipelineResult};
