//! Service layer for session creation, transitions, and result recording.
//!
//! Session creation serializes per tenant so that concurrent requests
//! cannot both observe a stale active-session count and overrun the
//! tenant quota.

use crate::session::{
    domain::{
        NewSessionParams, SessionDomainError, SessionEntity, SessionId, SessionKind,
        SessionPriority, SessionStatus, TaskEntity, TaskId, TaskStatus, TenantId,
    },
    ports::{
        SessionRepository, SessionRepositoryError, TaskRepository, TaskRepositoryError,
        TenantRepository, TenantRepositoryError,
    },
};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use thiserror::Error;
use tokio::sync::Mutex;

/// Request payload for creating a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSessionRequest {
    title: String,
    initial_prompt: String,
    priority: SessionPriority,
    kind: SessionKind,
}

impl CreateSessionRequest {
    /// Creates a request with required session fields.
    #[must_use]
    pub fn new(title: impl Into<String>, initial_prompt: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            initial_prompt: initial_prompt.into(),
            priority: SessionPriority::Normal,
            kind: SessionKind::Interactive,
        }
    }

    /// Sets the scheduling priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: SessionPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the session kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: SessionKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Agent-reported outcome for a single task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskResultReport {
    success: bool,
    output: Option<serde_json::Value>,
}

impl TaskResultReport {
    /// Creates a report with the task outcome flag.
    #[must_use]
    pub const fn new(success: bool) -> Self {
        Self {
            success,
            output: None,
        }
    }

    /// Attaches the agent-produced result payload.
    #[must_use]
    pub fn with_output(mut self, output: serde_json::Value) -> Self {
        self.output = Some(output);
        self
    }
}

/// Service-level errors for session lifecycle operations.
#[derive(Debug, Error)]
pub enum SessionLifecycleError {
    /// The tenant is already at its concurrent session ceiling.
    #[error("tenant {tenant_id} has reached its limit of {limit} concurrent sessions")]
    QuotaExceeded {
        /// Tenant whose quota was hit.
        tenant_id: TenantId,
        /// Configured quota ceiling.
        limit: u32,
    },

    /// The tenant identifier did not resolve.
    #[error("tenant not found: {0}")]
    TenantNotFound(TenantId),

    /// The session identifier did not resolve.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// The task identifier did not resolve.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] SessionDomainError),

    /// Session repository operation failed.
    #[error(transparent)]
    SessionRepository(#[from] SessionRepositoryError),

    /// Tenant repository operation failed.
    #[error(transparent)]
    TenantRepository(#[from] TenantRepositoryError),

    /// Task repository operation failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),
}

/// Result type for session lifecycle service operations.
pub type SessionLifecycleResult<T> = Result<T, SessionLifecycleError>;

/// Session lifecycle orchestration service.
#[derive(Clone)]
pub struct SessionLifecycleService<S, T, K, C>
where
    S: SessionRepository,
    T: TenantRepository,
    K: TaskRepository,
    C: Clock + Send + Sync,
{
    sessions: Arc<S>,
    tenants: Arc<T>,
    tasks: Arc<K>,
    clock: Arc<C>,
    tenant_locks: Arc<StdMutex<HashMap<TenantId, Arc<Mutex<()>>>>>,
}

impl<S, T, K, C> SessionLifecycleService<S, T, K, C>
where
    S: SessionRepository,
    T: TenantRepository,
    K: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new session lifecycle service.
    #[must_use]
    pub fn new(sessions: Arc<S>, tenants: Arc<T>, tasks: Arc<K>, clock: Arc<C>) -> Self {
        Self {
            sessions,
            tenants,
            tasks,
            clock,
            tenant_locks: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    /// Creates a new pending session for the tenant, enforcing the
    /// tenant's concurrency quota.
    ///
    /// The quota read and the session write happen under a per-tenant
    /// critical section, so concurrent requests for the same tenant
    /// serialize rather than racing past the limit.
    ///
    /// # Errors
    ///
    /// Returns [`SessionLifecycleError::QuotaExceeded`] when the tenant
    /// is at its ceiling (no session is persisted),
    /// [`SessionLifecycleError::TenantNotFound`] when the tenant does not
    /// resolve, or validation/repository errors.
    pub async fn create_session(
        &self,
        tenant_id: TenantId,
        request: CreateSessionRequest,
    ) -> SessionLifecycleResult<SessionEntity> {
        let tenant = self
            .tenants
            .find_by_id(tenant_id)
            .await?
            .ok_or(SessionLifecycleError::TenantNotFound(tenant_id))?;

        // Validate before entering the critical section.
        let session = SessionEntity::new(
            NewSessionParams {
                tenant_id,
                title: request.title,
                initial_prompt: request.initial_prompt,
                priority: request.priority,
                kind: request.kind,
            },
            &*self.clock,
        )?;

        let lock = self.tenant_lock(tenant_id);
        let _guard = lock.lock().await;

        let active = self.sessions.count_active_by_tenant(tenant_id).await?;
        let limit = tenant.max_concurrent_sessions();
        if active >= limit {
            return Err(SessionLifecycleError::QuotaExceeded { tenant_id, limit });
        }

        self.sessions.save(&session).await?;
        Ok(session)
    }

    /// Applies a validated status transition to a session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionLifecycleError::SessionNotFound`] when the
    /// session does not resolve, or
    /// [`SessionDomainError::InvalidSessionTransition`] (wrapped) when
    /// the target is unreachable; in both cases nothing is persisted.
    pub async fn transition(
        &self,
        session_id: SessionId,
        target: SessionStatus,
    ) -> SessionLifecycleResult<SessionEntity> {
        let mut session = self.find_session_or_error(session_id).await?;
        session.transition_to(target, &*self.clock)?;
        self.sessions.update(&session).await?;
        Ok(session)
    }

    /// Records an agent-reported task result against the owning session.
    ///
    /// The task moves to `Completed` or `Failed` and the outcome is
    /// folded into the session metrics. No session status transition is
    /// performed beyond what callers request separately.
    ///
    /// # Errors
    ///
    /// Returns [`SessionLifecycleError::TaskNotFound`] when the task does
    /// not resolve, [`SessionLifecycleError::SessionNotFound`] when its
    /// owning session is missing, or transition/repository errors.
    pub async fn record_result(
        &self,
        task_id: TaskId,
        report: TaskResultReport,
    ) -> SessionLifecycleResult<SessionEntity> {
        let mut task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(SessionLifecycleError::TaskNotFound(task_id))?;

        let target = if report.success {
            TaskStatus::Completed
        } else {
            TaskStatus::Failed
        };
        task.transition_to(target, &*self.clock)?;

        let mut session = self.find_session_or_error(task.session_id()).await?;
        session.record_task_outcome(report.success, report.output, &*self.clock);

        self.tasks.update(&task).await?;
        self.sessions.update(&session).await?;
        Ok(session)
    }

    /// Finds a session by identifier.
    ///
    /// Returns `Ok(None)` when no session has the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`SessionLifecycleError::SessionRepository`] when
    /// persistence lookup fails.
    pub async fn find_session(
        &self,
        session_id: SessionId,
    ) -> SessionLifecycleResult<Option<SessionEntity>> {
        Ok(self.sessions.find_by_id(session_id).await?)
    }

    /// Returns the session's tasks in priority order.
    ///
    /// # Errors
    ///
    /// Returns [`SessionLifecycleError::TaskRepository`] when persistence
    /// lookup fails.
    pub async fn list_tasks(
        &self,
        session_id: SessionId,
    ) -> SessionLifecycleResult<Vec<TaskEntity>> {
        Ok(self.tasks.list_by_session(session_id).await?)
    }

    async fn find_session_or_error(
        &self,
        session_id: SessionId,
    ) -> SessionLifecycleResult<SessionEntity> {
        self.sessions
            .find_by_id(session_id)
            .await?
            .ok_or(SessionLifecycleError::SessionNotFound(session_id))
    }

    /// Returns the serialization lock for a tenant, creating it on first
    /// use.
    fn tenant_lock(&self, tenant_id: TenantId) -> Arc<Mutex<()>> {
        let mut locks = match self.tenant_locks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(locks.entry(tenant_id).or_default())
    }
}
