//! Domain model for sessions, tasks, tenants, and session contexts.
//!
//! All infrastructure concerns are kept outside the domain boundary;
//! aggregates mutate only through validated transitions.

mod context;
mod error;
mod ids;
mod session;
mod task;
mod tenant;

pub use context::{ContextScope, PersistedContextData, SessionContext};
pub use error::{
    ParseContextScopeError, ParseSessionStatusError, ParseTaskComplexityError,
    ParseTaskStatusError, SessionDomainError,
};
pub use ids::{ContextId, SessionId, TaskId, TenantId};
pub use session::{
    NewSessionParams, PersistedSessionData, SessionEntity, SessionKind, SessionMetrics,
    SessionPriority, SessionStatus,
};
pub use task::{NewTaskParams, PersistedTaskData, TaskComplexity, TaskEntity, TaskStatus};
pub use tenant::Tenant;
