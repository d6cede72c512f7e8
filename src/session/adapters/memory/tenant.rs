//! Thread-safe in-memory tenant repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::session::{
    domain::{Tenant, TenantId},
    ports::{TenantRepository, TenantRepositoryError, TenantRepositoryResult},
};

/// Thread-safe in-memory tenant repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTenantRepository {
    state: Arc<RwLock<HashMap<TenantId, Tenant>>>,
}

impl InMemoryTenantRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TenantRepository for InMemoryTenantRepository {
    async fn save(&self, tenant: &Tenant) -> TenantRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TenantRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.contains_key(&tenant.id()) {
            return Err(TenantRepositoryError::DuplicateTenant(tenant.id()));
        }
        state.insert(tenant.id(), tenant.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TenantId) -> TenantRepositoryResult<Option<Tenant>> {
        let state = self.state.read().map_err(|err| {
            TenantRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(&id).cloned())
    }
}
