//! Integration tests for agent registration, heartbeat authentication,
//! and routing.

use conductor::agent_registry::{
    adapters::memory::InMemoryAgentRepository,
    domain::{AgentCapability, AgentId},
    services::{
        AgentRegistryService, HeartbeatOutcome, HeartbeatReport, RegisterAgentRequest,
        RoutingOutcome,
    },
};
use mockable::DefaultClock;
use rstest::rstest;
use std::sync::Arc;

fn registry() -> (
    Arc<InMemoryAgentRepository>,
    AgentRegistryService<InMemoryAgentRepository, DefaultClock>,
) {
    let repository = Arc::new(InMemoryAgentRepository::new());
    let service = AgentRegistryService::new(Arc::clone(&repository), Arc::new(DefaultClock));
    (repository, service)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registered_agent_heartbeats_and_serves_routing() {
    let (_repository, service) = registry();

    let receipt = service
        .register(
            RegisterAgentRequest::new("code_assistant", "1.0.0", "https://agents.example/coder")
                .with_capabilities(["code_generation", "test_generation"]),
        )
        .await
        .expect("registration should succeed");

    let denied = service
        .heartbeat(
            AgentId::new(),
            receipt.auth_token.as_str(),
            HeartbeatReport::new(0),
        )
        .await
        .expect("heartbeat should succeed");
    assert_eq!(denied, HeartbeatOutcome::Denied, "unknown agent id");

    let denied = service
        .heartbeat(receipt.agent_id, "forged-token", HeartbeatReport::new(0))
        .await
        .expect("heartbeat should succeed");
    assert_eq!(denied, HeartbeatOutcome::Denied, "wrong token");

    let accepted = service
        .heartbeat(
            receipt.agent_id,
            receipt.auth_token.as_str(),
            HeartbeatReport::new(1),
        )
        .await
        .expect("heartbeat should succeed");
    assert_eq!(accepted, HeartbeatOutcome::Accepted);

    let routed = service
        .route(AgentCapability::TestGeneration)
        .await
        .expect("routing should succeed");
    assert_eq!(routed, RoutingOutcome::Routed(receipt.agent_id));

    let agent = service
        .find_by_id(receipt.agent_id)
        .await
        .expect("lookup should succeed")
        .expect("agent should exist");
    assert_eq!(agent.current_load(), 2, "heartbeat load plus one assignment");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn routing_balances_load_across_capable_agents() {
    let (_repository, service) = registry();
    let request = || {
        RegisterAgentRequest::new("code_assistant", "1.0.0", "https://agents.example/coder")
            .with_capabilities(["code_generation"])
    };
    let first = service
        .register(request())
        .await
        .expect("registration should succeed");
    let second = service
        .register(request())
        .await
        .expect("registration should succeed");

    let mut routed = Vec::new();
    for _ in 0..2 {
        match service
            .route(AgentCapability::CodeGeneration)
            .await
            .expect("routing should succeed")
        {
            RoutingOutcome::Routed(id) => routed.push(id),
            RoutingOutcome::NoCapableAgent => panic!("both agents are available"),
        }
    }

    routed.sort_by_key(|id| id.into_inner());
    let mut expected = vec![first.agent_id, second.agent_id];
    expected.sort_by_key(|id| id.into_inner());
    assert_eq!(routed, expected, "each agent should take one assignment");
}
