//! Port contracts for agent registration and routing.
//!
//! Ports define infrastructure-agnostic interfaces used by the registry
//! services.

pub mod repository;

pub use repository::{AgentRepository, AgentRepositoryError, AgentRepositoryResult};
