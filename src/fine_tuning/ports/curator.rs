//! Port contract for training dataset curation.

use crate::session::ports::SessionRepositoryError;
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Result type for curation operations.
pub type CurationResult<T> = Result<T, CurationError>;

/// Training dataset curation contract.
#[async_trait]
pub trait DatasetCurator: Send + Sync {
    /// Writes a JSONL training dataset from qualifying completed
    /// sessions into `output_dir`.
    ///
    /// Returns the path of the written file, or `None` when no session
    /// met the threshold (no file is created in that case).
    ///
    /// # Errors
    ///
    /// Returns [`CurationError`] when the session scan, serialization,
    /// or file write fails.
    async fn curate(
        &self,
        output_dir: &Utf8Path,
        min_success_rate: f64,
    ) -> CurationResult<Option<Utf8PathBuf>>;
}

/// Errors returned by dataset curator implementations.
#[derive(Debug, Error)]
pub enum CurationError {
    /// The completed-session scan failed.
    #[error(transparent)]
    SessionRepository(#[from] SessionRepositoryError),

    /// A dataset record could not be serialized.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// The dataset file could not be written.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
