//! Thread-safe in-memory session context repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::session::{
    domain::{ContextId, SessionContext},
    ports::{ContextRepository, ContextRepositoryError, ContextRepositoryResult},
};

/// Thread-safe in-memory session context repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContextRepository {
    state: Arc<RwLock<HashMap<ContextId, SessionContext>>>,
}

impl InMemoryContextRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContextRepository for InMemoryContextRepository {
    async fn save(&self, context: &SessionContext) -> ContextRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            ContextRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.contains_key(&context.id()) {
            return Err(ContextRepositoryError::DuplicateContext(context.id()));
        }
        state.insert(context.id(), context.clone());
        Ok(())
    }

    async fn update(&self, context: &SessionContext) -> ContextRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            ContextRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.contains_key(&context.id()) {
            return Err(ContextRepositoryError::NotFound(context.id()));
        }
        state.insert(context.id(), context.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ContextId) -> ContextRepositoryResult<Option<SessionContext>> {
        let state = self.state.read().map_err(|err| {
            ContextRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(&id).cloned())
    }
}
