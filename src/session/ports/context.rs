//! Repository port for session context persistence.

use crate::session::domain::{ContextId, SessionContext};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for context repository operations.
pub type ContextRepositoryResult<T> = Result<T, ContextRepositoryError>;

/// Session context persistence contract.
#[async_trait]
pub trait ContextRepository: Send + Sync {
    /// Stores a new context.
    ///
    /// # Errors
    ///
    /// Returns [`ContextRepositoryError::DuplicateContext`] when the
    /// context ID already exists.
    async fn save(&self, context: &SessionContext) -> ContextRepositoryResult<()>;

    /// Persists changes to an existing context (payload, timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`ContextRepositoryError::NotFound`] when the context does
    /// not exist.
    async fn update(&self, context: &SessionContext) -> ContextRepositoryResult<()>;

    /// Finds a context by identifier.
    ///
    /// Returns `None` when the context does not exist.
    async fn find_by_id(&self, id: ContextId) -> ContextRepositoryResult<Option<SessionContext>>;
}

/// Errors returned by context repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ContextRepositoryError {
    /// A context with the same identifier already exists.
    #[error("duplicate context identifier: {0}")]
    DuplicateContext(ContextId),

    /// The context was not found.
    #[error("context not found: {0}")]
    NotFound(ContextId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ContextRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
