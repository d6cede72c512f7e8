//! Repository port for session persistence and quota accounting.

use crate::session::domain::{SessionEntity, SessionId, TenantId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for session repository operations.
pub type SessionRepositoryResult<T> = Result<T, SessionRepositoryError>;

/// Session persistence contract.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Stores a new session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionRepositoryError::DuplicateSession`] when the
    /// session ID already exists.
    async fn save(&self, session: &SessionEntity) -> SessionRepositoryResult<()>;

    /// Persists changes to an existing session (status, metrics,
    /// timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`SessionRepositoryError::NotFound`] when the session does
    /// not exist.
    async fn update(&self, session: &SessionEntity) -> SessionRepositoryResult<()>;

    /// Finds a session by identifier.
    ///
    /// Returns `None` when the session does not exist.
    async fn find_by_id(&self, id: SessionId) -> SessionRepositoryResult<Option<SessionEntity>>;

    /// Counts the tenant's sessions in quota-bearing statuses.
    async fn count_active_by_tenant(&self, tenant_id: TenantId) -> SessionRepositoryResult<u32>;

    /// Returns all sessions in `Completed` status, across tenants.
    ///
    /// Used by dataset curation to scan candidate training data.
    async fn list_completed(&self) -> SessionRepositoryResult<Vec<SessionEntity>>;
}

/// Errors returned by session repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SessionRepositoryError {
    /// A session with the same identifier already exists.
    #[error("duplicate session identifier: {0}")]
    DuplicateSession(SessionId),

    /// The session was not found.
    #[error("session not found: {0}")]
    NotFound(SessionId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SessionRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
