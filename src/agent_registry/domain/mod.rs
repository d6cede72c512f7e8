//! Domain model for agent registration and routing.
//!
//! The agent domain models registered workers, their declared
//! capabilities, authentication tokens, and the load/liveness data that
//! routing decisions consume. All infrastructure concerns are kept
//! outside the domain boundary.

mod agent;
mod capability;
mod error;
mod ids;
mod token;

pub use agent::{
    AgentStatus, AgentType, NewAgentParams, PerformanceTier, PersistedAgentData, RegisteredAgent,
};
pub use capability::AgentCapability;
pub use error::{AgentDomainError, ParseAgentCapabilityError, ParseAgentStatusError};
pub use ids::AgentId;
pub use token::AuthToken;
