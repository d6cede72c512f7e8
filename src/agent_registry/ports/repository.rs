//! Repository port for agent registration persistence and lookup.

use crate::agent_registry::domain::{AgentId, RegisteredAgent};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for agent repository operations.
pub type AgentRepositoryResult<T> = Result<T, AgentRepositoryError>;

/// Agent registration persistence contract.
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Stores a new agent registration.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRepositoryError::DuplicateAgent`] when the agent ID
    /// already exists.
    async fn register(&self, agent: &RegisteredAgent) -> AgentRepositoryResult<()>;

    /// Persists changes to an existing agent (load, heartbeat, status,
    /// timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`AgentRepositoryError::NotFound`] when the agent does not
    /// exist.
    async fn update(&self, agent: &RegisteredAgent) -> AgentRepositoryResult<()>;

    /// Finds an agent by identifier.
    ///
    /// Returns `None` when the agent does not exist.
    async fn find_by_id(&self, id: AgentId) -> AgentRepositoryResult<Option<RegisteredAgent>>;

    /// Returns all registered agents regardless of status.
    async fn list_all(&self) -> AgentRepositoryResult<Vec<RegisteredAgent>>;
}

/// Errors returned by agent repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AgentRepositoryError {
    /// An agent with the same identifier already exists.
    #[error("duplicate agent identifier: {0}")]
    DuplicateAgent(AgentId),

    /// The agent was not found.
    #[error("agent not found: {0}")]
    NotFound(AgentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AgentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
