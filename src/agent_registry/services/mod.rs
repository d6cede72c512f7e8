//! Application services for agent registration and routing.

mod registry;

pub use registry::{
    AgentRegistryService, AgentRegistryServiceError, AgentRegistryServiceResult, HeartbeatOutcome,
    HeartbeatReport, RegisterAgentRequest, RegistrationReceipt, RoutingOutcome,
    RECOMMENDED_HEARTBEAT_INTERVAL_SECONDS,
};
