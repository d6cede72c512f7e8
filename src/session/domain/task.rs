//! Task aggregate root and task state machine.

use crate::agent_registry::domain::{AgentCapability, AgentId};

use super::{
    ParseTaskComplexityError, ParseTaskStatusError, SessionDomainError, SessionId, TaskId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal complexity estimate for a goal or task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskComplexity {
    /// Single short action.
    Trivial,
    /// Small unit of work with a verification step.
    Simple,
    /// Work requiring analysis before implementation.
    Moderate,
    /// Multi-stage work requiring review and documentation.
    Complex,
}

impl TaskComplexity {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trivial => "trivial",
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
        }
    }
}

impl fmt::Display for TaskComplexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskComplexity {
    type Error = ParseTaskComplexityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "trivial" => Ok(Self::Trivial),
            "simple" => Ok(Self::Simple),
            "moderate" => Ok(Self::Moderate),
            "complex" => Ok(Self::Complex),
            _ => Err(ParseTaskComplexityError(value.to_owned())),
        }
    }
}

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task exists but has not been routed to an agent.
    Pending,
    /// Task has been routed to an agent.
    Assigned,
    /// Task finished successfully.
    Completed,
    /// Task finished unsuccessfully.
    Failed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns whether this status is final.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns whether transition to `target` is allowed.
    ///
    /// An unrouted task may still complete or fail directly, covering
    /// agents that report a result before the assignment is recorded.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Assigned | Self::Completed | Self::Failed)
                | (Self::Assigned, Self::Completed | Self::Failed)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "assigned" => Ok(Self::Assigned),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Task aggregate root.
///
/// A task is a decomposed unit of work owned by a session and routed to
/// exactly one agent at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEntity {
    id: TaskId,
    session_id: SessionId,
    title: String,
    complexity: TaskComplexity,
    priority: u8,
    status: TaskStatus,
    required_capability: AgentCapability,
    estimated_effort_minutes: u32,
    assigned_agent: Option<AgentId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Construction parameters for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskParams {
    /// Owning session.
    pub session_id: SessionId,
    /// Short task title.
    pub title: String,
    /// Complexity estimate inherited from the goal analysis.
    pub complexity: TaskComplexity,
    /// Relative priority; higher runs earlier.
    pub priority: u8,
    /// Capability an agent must hold to take this task.
    pub required_capability: AgentCapability,
    /// Effort estimate in minutes.
    pub estimated_effort_minutes: u32,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning session.
    pub session_id: SessionId,
    /// Persisted title.
    pub title: String,
    /// Persisted complexity estimate.
    pub complexity: TaskComplexity,
    /// Persisted priority.
    pub priority: u8,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted capability requirement.
    pub required_capability: AgentCapability,
    /// Persisted effort estimate in minutes.
    pub estimated_effort_minutes: u32,
    /// Persisted assigned agent, if routed.
    pub assigned_agent: Option<AgentId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TaskEntity {
    /// Creates a new task in [`TaskStatus::Pending`].
    #[must_use]
    pub fn new(params: NewTaskParams, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            session_id: params.session_id,
            title: params.title,
            complexity: params.complexity,
            priority: params.priority,
            status: TaskStatus::Pending,
            required_capability: params.required_capability,
            estimated_effort_minutes: params.estimated_effort_minutes,
            assigned_agent: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            session_id: data.session_id,
            title: data.title,
            complexity: data.complexity,
            priority: data.priority,
            status: data.status,
            required_capability: data.required_capability,
            estimated_effort_minutes: data.estimated_effort_minutes,
            assigned_agent: data.assigned_agent,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning session identifier.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the complexity estimate.
    #[must_use]
    pub const fn complexity(&self) -> TaskComplexity {
        self.complexity
    }

    /// Returns the relative priority; higher runs earlier.
    #[must_use]
    pub const fn priority(&self) -> u8 {
        self.priority
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the capability an agent must hold to take this task.
    #[must_use]
    pub const fn required_capability(&self) -> AgentCapability {
        self.required_capability
    }

    /// Returns the effort estimate in minutes.
    #[must_use]
    pub const fn estimated_effort_minutes(&self) -> u32 {
        self.estimated_effort_minutes
    }

    /// Returns the assigned agent, if the task has been routed.
    #[must_use]
    pub const fn assigned_agent(&self) -> Option<AgentId> {
        self.assigned_agent
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

    /// Records that the task was routed to an agent.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::InvalidTaskTransition`] when the
    /// task is not in [`TaskStatus::Pending`].
    pub fn assign_to(
        &mut self,
        agent: AgentId,
        clock: &impl Clock,
    ) -> Result<(), SessionDomainError> {
        self.apply_transition(TaskStatus::Assigned, clock)?;
        self.assigned_agent = Some(agent);
        Ok(())
    }

    /// Applies a validated state transition.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::InvalidTaskTransition`] when the
    /// target is not reachable from the current status; the task is left
    /// unchanged.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), SessionDomainError> {
        self.apply_transition(target, clock)
    }

    fn apply_transition(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), SessionDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(SessionDomainError::InvalidTaskTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
