//! Repository port for tenant lookup.

use crate::session::domain::{Tenant, TenantId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for tenant repository operations.
pub type TenantRepositoryResult<T> = Result<T, TenantRepositoryError>;

/// Tenant lookup contract.
///
/// Tenant administration (creation, quota changes) happens outside the
/// core; the core only reads tenants to attribute quota.
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Stores a tenant record.
    ///
    /// # Errors
    ///
    /// Returns [`TenantRepositoryError::DuplicateTenant`] when the tenant
    /// ID already exists.
    async fn save(&self, tenant: &Tenant) -> TenantRepositoryResult<()>;

    /// Finds a tenant by identifier.
    ///
    /// Returns `None` when the tenant does not exist.
    async fn find_by_id(&self, id: TenantId) -> TenantRepositoryResult<Option<Tenant>>;
}

/// Errors returned by tenant repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TenantRepositoryError {
    /// A tenant with the same identifier already exists.
    #[error("duplicate tenant identifier: {0}")]
    DuplicateTenant(TenantId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TenantRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
