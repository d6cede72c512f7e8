//! Tenant value object.

use super::{SessionDomainError, TenantId};
use serde::{Deserialize, Serialize};

/// Quota-bearing organizational unit owning sessions.
///
/// Identity is immutable; the quota ceiling changes only through
/// administrative action outside the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    id: TenantId,
    name: String,
    slug: String,
    max_concurrent_sessions: u32,
}

impl Tenant {
    /// Creates a tenant with a fresh identifier.
    ///
    /// The slug is trimmed and lowercased before validation.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError`] when the name is empty or the slug
    /// is empty or contains characters outside `[a-z0-9-]`.
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        max_concurrent_sessions: u32,
    ) -> Result<Self, SessionDomainError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(SessionDomainError::EmptyTenantName);
        }
        let slug = slug.into().trim().to_ascii_lowercase();
        if slug.is_empty() {
            return Err(SessionDomainError::EmptyTenantSlug);
        }
        if !slug
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
        {
            return Err(SessionDomainError::InvalidTenantSlug(slug));
        }
        Ok(Self {
            id: TenantId::new(),
            name,
            slug,
            max_concurrent_sessions,
        })
    }

    /// Reconstructs a tenant from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: TenantId,
        name: String,
        slug: String,
        max_concurrent_sessions: u32,
    ) -> Self {
        Self {
            id,
            name,
            slug,
            max_concurrent_sessions,
        }
    }

    /// Returns the tenant identifier.
    #[must_use]
    pub const fn id(&self) -> TenantId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the URL-safe slug.
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Returns the quota ceiling on concurrently active sessions.
    #[must_use]
    pub const fn max_concurrent_sessions(&self) -> u32 {
        self.max_concurrent_sessions
    }
}
