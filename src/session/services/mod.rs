//! Application services for session lifecycle orchestration.

mod context;
mod decomposer;
mod lifecycle;

pub use context::{ContextServiceError, ContextServiceResult, SessionContextService};
pub use decomposer::{TaskDecomposer, TaskDecompositionError, TaskDecompositionResult};
pub use lifecycle::{
    CreateSessionRequest, SessionLifecycleError, SessionLifecycleResult, SessionLifecycleService,
    TaskResultReport,
};
