//! Session aggregate root and lifecycle state machine.

use super::{ParseSessionStatusError, SessionDomainError, SessionId, TenantId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Session lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Session has been created but work has not started.
    Pending,
    /// Session work is in progress.
    Active,
    /// Session finished successfully.
    Completed,
    /// Session finished unsuccessfully.
    Failed,
    /// Session was cancelled before completion.
    Cancelled,
}

impl SessionStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether this status counts against the tenant quota.
    #[must_use]
    pub const fn counts_against_quota(self) -> bool {
        matches!(self, Self::Pending | Self::Active)
    }

    /// Returns whether this status is final.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Returns whether transition to `target` is allowed.
    ///
    /// Terminal states admit no outgoing transitions.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Active | Self::Cancelled)
                | (Self::Active, Self::Completed | Self::Failed | Self::Cancelled)
        )
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SessionStatus {
    type Error = ParseSessionStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseSessionStatusError(value.to_owned())),
        }
    }
}

/// Scheduling priority of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPriority {
    /// Background work.
    Low,
    /// Default priority.
    Normal,
    /// Work that should preempt normal-priority sessions.
    High,
    /// Work that must run as soon as possible.
    Critical,
}

/// Kind of work a session performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Tenant-driven interactive work.
    Interactive,
    /// Unattended batch work.
    Batch,
    /// Evaluation runs used for quality measurement.
    Evaluation,
}

/// Outcome metrics accumulated as tasks report results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionMetrics {
    /// Fraction of finished tasks that succeeded, in `[0, 1]`.
    pub success_rate: f64,
    /// Number of tasks that finished successfully.
    pub tasks_completed: u32,
    /// Number of tasks that finished unsuccessfully.
    pub tasks_failed: u32,
    /// Most recent result payload reported by an agent, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl SessionMetrics {
    /// Folds one task outcome into the running metrics.
    pub fn record_outcome(&mut self, success: bool, result: Option<serde_json::Value>) {
        if success {
            self.tasks_completed += 1;
        } else {
            self.tasks_failed += 1;
        }
        let finished = self.tasks_completed + self.tasks_failed;
        self.success_rate = f64::from(self.tasks_completed) / f64::from(finished);
        if result.is_some() {
            self.result = result;
        }
    }
}

/// Session aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEntity {
    id: SessionId,
    tenant_id: TenantId,
    title: String,
    status: SessionStatus,
    priority: SessionPriority,
    kind: SessionKind,
    initial_prompt: String,
    metrics: SessionMetrics,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Construction parameters for a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSessionParams {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Short human-readable title.
    pub title: String,
    /// Goal description driving decomposition.
    pub initial_prompt: String,
    /// Scheduling priority.
    pub priority: SessionPriority,
    /// Kind of work.
    pub kind: SessionKind,
}

/// Parameter object for reconstructing a persisted session.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedSessionData {
    /// Persisted session identifier.
    pub id: SessionId,
    /// Persisted owning tenant.
    pub tenant_id: TenantId,
    /// Persisted title.
    pub title: String,
    /// Persisted lifecycle status.
    pub status: SessionStatus,
    /// Persisted priority.
    pub priority: SessionPriority,
    /// Persisted session kind.
    pub kind: SessionKind,
    /// Persisted initial prompt.
    pub initial_prompt: String,
    /// Persisted outcome metrics.
    pub metrics: SessionMetrics,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl SessionEntity {
    /// Creates a new session in [`SessionStatus::Pending`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError`] when the title or initial prompt is
    /// empty after trimming.
    pub fn new(params: NewSessionParams, clock: &impl Clock) -> Result<Self, SessionDomainError> {
        let title = params.title.trim().to_owned();
        if title.is_empty() {
            return Err(SessionDomainError::EmptyTitle);
        }
        let initial_prompt = params.initial_prompt.trim().to_owned();
        if initial_prompt.is_empty() {
            return Err(SessionDomainError::EmptyPrompt);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: SessionId::new(),
            tenant_id: params.tenant_id,
            title,
            status: SessionStatus::Pending,
            priority: params.priority,
            kind: params.kind,
            initial_prompt,
            metrics: SessionMetrics::default(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a session from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSessionData) -> Self {
        Self {
            id: data.id,
            tenant_id: data.tenant_id,
            title: data.title,
            status: data.status,
            priority: data.priority,
            kind: data.kind,
            initial_prompt: data.initial_prompt,
            metrics: data.metrics,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the session identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the owning tenant identifier.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the session title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Returns the scheduling priority.
    #[must_use]
    pub const fn priority(&self) -> SessionPriority {
        self.priority
    }

    /// Returns the session kind.
    #[must_use]
    pub const fn kind(&self) -> SessionKind {
        self.kind
    }

    /// Returns the goal description.
    #[must_use]
    pub fn initial_prompt(&self) -> &str {
        &self.initial_prompt
    }

    /// Returns the accumulated outcome metrics.
    #[must_use]
    pub const fn metrics(&self) -> &SessionMetrics {
        &self.metrics
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

    /// Applies a validated state transition.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::InvalidSessionTransition`] when the
    /// target is not reachable from the current status; the session is
    /// left unchanged.
    pub fn transition_to(
        &mut self,
        target: SessionStatus,
        clock: &impl Clock,
    ) -> Result<(), SessionDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(SessionDomainError::InvalidSessionTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Folds a task outcome into the session metrics.
    ///
    /// This records measurement only; any status change is a separate,
    /// explicitly requested transition.
    pub fn record_task_outcome(
        &mut self,
        success: bool,
        result: Option<serde_json::Value>,
        clock: &impl Clock,
    ) {
        self.metrics.record_outcome(success, result);
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
