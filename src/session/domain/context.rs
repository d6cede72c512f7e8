//! Scoped session context records.
//!
//! Contexts carry key-value state attached to a session. Each context
//! has a visibility scope; merge operations are only permitted between
//! contexts of identical scope.

use super::{ContextId, ParseContextScopeError, SessionDomainError, SessionId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Visibility scope of a session context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextScope {
    /// Visible only within the owning session.
    Session,
    /// Shared across the owning tenant's sessions.
    Tenant,
    /// Shared across all tenants.
    Global,
}

impl ContextScope {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Tenant => "tenant",
            Self::Global => "global",
        }
    }
}

impl fmt::Display for ContextScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ContextScope {
    type Error = ParseContextScopeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "session" => Ok(Self::Session),
            "tenant" => Ok(Self::Tenant),
            "global" => Ok(Self::Global),
            _ => Err(ParseContextScopeError(value.to_owned())),
        }
    }
}

/// Scoped key-value context attached to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    id: ContextId,
    session_id: SessionId,
    scope: ContextScope,
    payload: serde_json::Map<String, serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted context.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedContextData {
    /// Persisted context identifier.
    pub id: ContextId,
    /// Persisted owning session.
    pub session_id: SessionId,
    /// Persisted visibility scope.
    pub scope: ContextScope,
    /// Persisted key-value payload.
    pub payload: serde_json::Map<String, serde_json::Value>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl SessionContext {
    /// Creates a new context for a session.
    #[must_use]
    pub fn new(
        session_id: SessionId,
        scope: ContextScope,
        payload: serde_json::Map<String, serde_json::Value>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ContextId::new(),
            session_id,
            scope,
            payload,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a context from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedContextData) -> Self {
        Self {
            id: data.id,
            session_id: data.session_id,
            scope: data.scope,
            payload: data.payload,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the context identifier.
    #[must_use]
    pub const fn id(&self) -> ContextId {
        self.id
    }

    /// Returns the owning session identifier.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Returns the visibility scope.
    #[must_use]
    pub const fn scope(&self) -> ContextScope {
        self.scope
    }

    /// Returns the key-value payload.
    #[must_use]
    pub const fn payload(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.payload
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Overlays another context's payload onto this one.
    ///
    /// Keys present in `other` replace keys in this context; the source
    /// context is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::ContextScopeMismatch`] when the two
    /// contexts have differing scopes; no keys are merged.
    pub fn merge_from(
        &mut self,
        other: &Self,
        clock: &impl Clock,
    ) -> Result<(), SessionDomainError> {
        if self.scope != other.scope {
            return Err(SessionDomainError::ContextScopeMismatch {
                base: self.scope,
                other: other.scope,
            });
        }
        for (key, value) in &other.payload {
            self.payload.insert(key.clone(), value.clone());
        }
        self.touch(clock);
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
