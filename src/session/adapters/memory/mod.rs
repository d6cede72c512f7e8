//! In-memory adapters for session ports.

mod context;
mod session;
mod task;
mod tenant;

pub use context::InMemoryContextRepository;
pub use session::InMemorySessionRepository;
pub use task::InMemoryTaskRepository;
pub use tenant::InMemoryTenantRepository;
