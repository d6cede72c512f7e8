//! Service layer for scoped session contexts.

use crate::session::{
    domain::{ContextId, ContextScope, SessionContext, SessionDomainError, SessionId},
    ports::{ContextRepository, ContextRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for session context operations.
#[derive(Debug, Error)]
pub enum ContextServiceError {
    /// The context identifier did not resolve.
    #[error("context not found: {0}")]
    ContextNotFound(ContextId),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] SessionDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ContextRepositoryError),
}

/// Result type for session context service operations.
pub type ContextServiceResult<T> = Result<T, ContextServiceError>;

/// Scoped session context orchestration service.
#[derive(Clone)]
pub struct SessionContextService<X, C>
where
    X: ContextRepository,
    C: Clock + Send + Sync,
{
    contexts: Arc<X>,
    clock: Arc<C>,
}

impl<X, C> SessionContextService<X, C>
where
    X: ContextRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new session context service.
    #[must_use]
    pub const fn new(contexts: Arc<X>, clock: Arc<C>) -> Self {
        Self { contexts, clock }
    }

    /// Creates and persists a new context for a session.
    ///
    /// # Errors
    ///
    /// Returns [`ContextServiceError::Repository`] when persistence
    /// fails.
    pub async fn create_context(
        &self,
        session_id: SessionId,
        scope: ContextScope,
        payload: serde_json::Map<String, serde_json::Value>,
    ) -> ContextServiceResult<SessionContext> {
        let context = SessionContext::new(session_id, scope, payload, &*self.clock);
        self.contexts.save(&context).await?;
        Ok(context)
    }

    /// Retrieves a context by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ContextServiceError::ContextNotFound`] when the
    /// identifier does not resolve.
    pub async fn get_context(&self, id: ContextId) -> ContextServiceResult<SessionContext> {
        self.contexts
            .find_by_id(id)
            .await?
            .ok_or(ContextServiceError::ContextNotFound(id))
    }

    /// Merges one context's payload into another of the same scope.
    ///
    /// The source context is left untouched; the merged base is
    /// persisted and returned.
    ///
    /// # Errors
    ///
    /// Returns [`ContextServiceError::ContextNotFound`] when either
    /// identifier does not resolve, or
    /// [`SessionDomainError::ContextScopeMismatch`] (wrapped) when the
    /// scopes differ; nothing is persisted in either case.
    pub async fn merge_contexts(
        &self,
        base_id: ContextId,
        other_id: ContextId,
    ) -> ContextServiceResult<SessionContext> {
        let mut base = self.get_context(base_id).await?;
        let other = self.get_context(other_id).await?;
        base.merge_from(&other, &*self.clock)?;
        self.contexts.update(&base).await?;
        Ok(base)
    }
}
