//! Thread-safe in-memory agent repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::agent_registry::{
    domain::{AgentId, RegisteredAgent},
    ports::{AgentRepository, AgentRepositoryError, AgentRepositoryResult},
};

/// Thread-safe in-memory agent repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentRepository {
    state: Arc<RwLock<HashMap<AgentId, RegisteredAgent>>>,
}

impl InMemoryAgentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentRepository for InMemoryAgentRepository {
    async fn register(&self, agent: &RegisteredAgent) -> AgentRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            AgentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.contains_key(&agent.id()) {
            return Err(AgentRepositoryError::DuplicateAgent(agent.id()));
        }
        state.insert(agent.id(), agent.clone());
        Ok(())
    }

    async fn update(&self, agent: &RegisteredAgent) -> AgentRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            AgentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.contains_key(&agent.id()) {
            return Err(AgentRepositoryError::NotFound(agent.id()));
        }
        state.insert(agent.id(), agent.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: AgentId) -> AgentRepositoryResult<Option<RegisteredAgent>> {
        let state = self.state.read().map_err(|err| {
            AgentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(&id).cloned())
    }

    async fn list_all(&self) -> AgentRepositoryResult<Vec<RegisteredAgent>> {
        let state = self.state.read().map_err(|err| {
            AgentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.values().cloned().collect())
    }
}
