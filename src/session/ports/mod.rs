//! Port contracts for session lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by the session
//! services.

pub mod context;
pub mod session;
pub mod task;
pub mod tenant;

pub use context::{ContextRepository, ContextRepositoryError, ContextRepositoryResult};
pub use session::{SessionRepository, SessionRepositoryError, SessionRepositoryResult};
pub use task::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use tenant::{TenantRepository, TenantRepositoryError, TenantRepositoryResult};
