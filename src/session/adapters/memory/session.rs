//! Thread-safe in-memory session repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::session::{
    domain::{SessionEntity, SessionId, SessionStatus, TenantId},
    ports::{SessionRepository, SessionRepositoryError, SessionRepositoryResult},
};

/// Thread-safe in-memory session repository.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    state: Arc<RwLock<InMemorySessionState>>,
}

#[derive(Debug, Default)]
struct InMemorySessionState {
    sessions: HashMap<SessionId, SessionEntity>,
    tenant_index: HashMap<TenantId, Vec<SessionId>>,
}

impl InMemorySessionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn save(&self, session: &SessionEntity) -> SessionRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            SessionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.sessions.contains_key(&session.id()) {
            return Err(SessionRepositoryError::DuplicateSession(session.id()));
        }
        state
            .tenant_index
            .entry(session.tenant_id())
            .or_default()
            .push(session.id());
        state.sessions.insert(session.id(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &SessionEntity) -> SessionRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            SessionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.sessions.contains_key(&session.id()) {
            return Err(SessionRepositoryError::NotFound(session.id()));
        }
        state.sessions.insert(session.id(), session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: SessionId) -> SessionRepositoryResult<Option<SessionEntity>> {
        let state = self.state.read().map_err(|err| {
            SessionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.sessions.get(&id).cloned())
    }

    async fn count_active_by_tenant(&self, tenant_id: TenantId) -> SessionRepositoryResult<u32> {
        let state = self.state.read().map_err(|err| {
            SessionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let count = state
            .tenant_index
            .get(&tenant_id)
            .map_or(0, |ids| {
                ids.iter()
                    .filter_map(|id| state.sessions.get(id))
                    .filter(|session| session.status().counts_against_quota())
                    .count()
            });
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn list_completed(&self) -> SessionRepositoryResult<Vec<SessionEntity>> {
        let state = self.state.read().map_err(|err| {
            SessionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut sessions: Vec<SessionEntity> = state
            .sessions
            .values()
            .filter(|session| session.status() == SessionStatus::Completed)
            .cloned()
            .collect();
        sessions.sort_by_key(SessionEntity::created_at);
        Ok(sessions)
    }
}
