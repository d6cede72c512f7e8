//! Service layer for agent registration, liveness, and routing.
//!
//! Provides [`AgentRegistryService`] which coordinates agent
//! registration, token authentication, heartbeat processing, and
//! capability-based routing.

use crate::agent_registry::{
    domain::{
        AgentCapability, AgentDomainError, AgentId, AgentStatus, AgentType, AuthToken,
        NewAgentParams, PerformanceTier, RegisteredAgent,
    },
    ports::{AgentRepository, AgentRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Heartbeat interval recommended to newly registered agents, in seconds.
pub const RECOMMENDED_HEARTBEAT_INTERVAL_SECONDS: u32 = 30;

/// Request payload for registering a new agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterAgentRequest {
    agent_type: String,
    version: String,
    endpoint: String,
    capabilities: Vec<String>,
    performance_tier: PerformanceTier,
    metadata: Option<serde_json::Value>,
}

impl RegisterAgentRequest {
    /// Creates a request with required registration fields.
    #[must_use]
    pub fn new(
        agent_type: impl Into<String>,
        version: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            agent_type: agent_type.into(),
            version: version.into(),
            endpoint: endpoint.into(),
            capabilities: Vec::new(),
            performance_tier: PerformanceTier::Standard,
            metadata: None,
        }
    }

    /// Sets the declared capability tags.
    #[must_use]
    pub fn with_capabilities(
        mut self,
        capabilities: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the declared performance tier.
    #[must_use]
    pub const fn with_performance_tier(mut self, tier: PerformanceTier) -> Self {
        self.performance_tier = tier;
        self
    }

    /// Sets free-form registration metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Agent-reported liveness payload submitted with a heartbeat.
///
/// The load figure feeds routing decisions; the self-reported status
/// and runtime metrics are advisory and never override the agent's
/// administrative status.
#[derive(Debug, Clone, PartialEq)]
pub struct HeartbeatReport {
    current_load: u32,
    status: Option<AgentStatus>,
    metrics: Option<serde_json::Value>,
}

impl HeartbeatReport {
    /// Creates a report carrying the agent's load figure.
    #[must_use]
    pub const fn new(current_load: u32) -> Self {
        Self {
            current_load,
            status: None,
            metrics: None,
        }
    }

    /// Sets the agent's self-reported status.
    #[must_use]
    pub const fn with_status(mut self, status: AgentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches free-form runtime metrics.
    #[must_use]
    pub fn with_metrics(mut self, metrics: serde_json::Value) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Returns the reported load figure.
    #[must_use]
    pub const fn current_load(&self) -> u32 {
        self.current_load
    }

    /// Returns the self-reported status, if supplied.
    #[must_use]
    pub const fn status(&self) -> Option<AgentStatus> {
        self.status
    }

    /// Returns the runtime metrics, if supplied.
    #[must_use]
    pub const fn metrics(&self) -> Option<&serde_json::Value> {
        self.metrics.as_ref()
    }
}

/// Credentials and parameters returned from a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    /// Identifier assigned to the new agent.
    pub agent_id: AgentId,
    /// Secret token the agent must present on authenticated calls.
    pub auth_token: AuthToken,
    /// Recommended heartbeat cadence in seconds.
    pub heartbeat_interval_seconds: u32,
}

/// Outcome of a heartbeat submission.
///
/// Authentication failure is a denial, not an error, so callers can
/// surface an unauthorized response without learning whether the agent
/// identifier exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum HeartbeatOutcome {
    /// The heartbeat was authenticated and recorded.
    Accepted,
    /// The token did not match; no agent state was mutated.
    Denied,
}

/// Outcome of a routing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum RoutingOutcome {
    /// A capable, fresh agent was selected and its load recorded.
    Routed(AgentId),
    /// No registered agent can currently take the work; callers decide
    /// retry and backoff policy.
    NoCapableAgent,
}

/// Service-level errors for agent registry operations.
#[derive(Debug, Error)]
pub enum AgentRegistryServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AgentDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] AgentRepositoryError),
}

/// Result type for agent registry service operations.
pub type AgentRegistryServiceResult<T> = Result<T, AgentRegistryServiceError>;

/// Agent registration, liveness, and routing orchestration service.
#[derive(Clone)]
pub struct AgentRegistryService<R, C>
where
    R: AgentRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> AgentRegistryService<R, C>
where
    R: AgentRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new agent registry service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Registers a new agent and issues its credentials.
    ///
    /// The token in the returned receipt is generated once; it is never
    /// reissued for the same agent identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError`] when input validation fails
    /// or the repository rejects persistence.
    pub async fn register(
        &self,
        request: RegisterAgentRequest,
    ) -> AgentRegistryServiceResult<RegistrationReceipt> {
        let RegisterAgentRequest {
            agent_type,
            version,
            endpoint,
            capabilities,
            performance_tier,
            metadata,
        } = request;

        let agent_type = AgentType::new(agent_type)?;
        let version = non_empty(version, AgentDomainError::EmptyVersion)?;
        let endpoint = non_empty(endpoint, AgentDomainError::EmptyEndpoint)?;
        let capabilities = parse_capabilities(&capabilities)?;

        let agent = RegisteredAgent::new(
            NewAgentParams {
                agent_type,
                version,
                endpoint,
                capabilities,
                performance_tier,
                heartbeat_interval_seconds: RECOMMENDED_HEARTBEAT_INTERVAL_SECONDS,
                metadata,
            },
            &*self.clock,
        );
        self.repository.register(&agent).await?;

        Ok(RegistrationReceipt {
            agent_id: agent.id(),
            auth_token: agent.auth_token().clone(),
            heartbeat_interval_seconds: agent.heartbeat_interval_seconds(),
        })
    }

    /// Checks whether the supplied token matches the agent's stored token.
    ///
    /// Returns `Ok(false)` on mismatch or unknown agent so callers can
    /// deny access without leaking agent existence.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn authenticate(
        &self,
        agent_id: AgentId,
        token: &str,
    ) -> AgentRegistryServiceResult<bool> {
        let agent = self.repository.find_by_id(agent_id).await?;
        Ok(agent.is_some_and(|found| found.auth_token().matches(token)))
    }

    /// Records an authenticated heartbeat, refreshing liveness and load.
    ///
    /// On denial no agent state is mutated. Of the report, only the load
    /// figure and the heartbeat timestamp are acted on; a heartbeat
    /// never changes the agent's administrative status.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError::Repository`] when persistence
    /// fails.
    pub async fn heartbeat(
        &self,
        agent_id: AgentId,
        token: &str,
        report: HeartbeatReport,
    ) -> AgentRegistryServiceResult<HeartbeatOutcome> {
        let Some(mut agent) = self.repository.find_by_id(agent_id).await? else {
            return Ok(HeartbeatOutcome::Denied);
        };
        if !agent.auth_token().matches(token) {
            return Ok(HeartbeatOutcome::Denied);
        }

        let HeartbeatReport { current_load, .. } = report;
        agent.record_heartbeat(current_load, &*self.clock);
        self.repository.update(&agent).await?;
        Ok(HeartbeatOutcome::Accepted)
    }

    /// Routes a capability requirement to the best available agent.
    ///
    /// Candidates must be active, fresh within their heartbeat window,
    /// and declare the capability. The least-loaded candidate wins; ties
    /// break towards the agent idle longest since its last assignment.
    /// The selected agent's load and assignment timestamp are recorded.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError::Repository`] when persistence
    /// fails.
    pub async fn route(
        &self,
        capability: AgentCapability,
    ) -> AgentRegistryServiceResult<RoutingOutcome> {
        let now = self.clock.utc();
        let agents = self.repository.list_all().await?;

        let selected = agents
            .into_iter()
            .filter(|agent| {
                agent.status() == AgentStatus::Active
                    && agent.has_capability(capability)
                    && !agent.is_stale(now)
            })
            .min_by_key(|agent| (agent.current_load(), assignment_age_key(agent)));

        let Some(mut agent) = selected else {
            tracing::debug!(capability = %capability, "no capable agent available");
            return Ok(RoutingOutcome::NoCapableAgent);
        };

        agent.record_assignment(&*self.clock);
        self.repository.update(&agent).await?;
        tracing::debug!(
            capability = %capability,
            agent_id = %agent.id(),
            load = agent.current_load(),
            "routed task to agent"
        );
        Ok(RoutingOutcome::Routed(agent.id()))
    }

    /// Deactivates an agent, removing it from routing without deletion.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError::Repository`] when the agent
    /// is not found or persistence fails.
    pub async fn deactivate(&self, agent_id: AgentId) -> AgentRegistryServiceResult<RegisteredAgent> {
        let mut agent = self.find_by_id_or_error(agent_id).await?;
        agent.deactivate(&*self.clock);
        self.repository.update(&agent).await?;
        Ok(agent)
    }

    /// Reactivates a previously deactivated agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError::Repository`] when the agent
    /// is not found or persistence fails.
    pub async fn activate(&self, agent_id: AgentId) -> AgentRegistryServiceResult<RegisteredAgent> {
        let mut agent = self.find_by_id_or_error(agent_id).await?;
        agent.activate(&*self.clock);
        self.repository.update(&agent).await?;
        Ok(agent)
    }

    /// Finds an agent registration by identifier.
    ///
    /// Returns `Ok(None)` when no agent has the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn find_by_id(
        &self,
        agent_id: AgentId,
    ) -> AgentRegistryServiceResult<Option<RegisteredAgent>> {
        Ok(self.repository.find_by_id(agent_id).await?)
    }

    async fn find_by_id_or_error(
        &self,
        agent_id: AgentId,
    ) -> AgentRegistryServiceResult<RegisteredAgent> {
        self.repository
            .find_by_id(agent_id)
            .await?
            .ok_or_else(|| AgentRepositoryError::NotFound(agent_id).into())
    }
}

/// Sort key ranking never-assigned agents ahead of recently assigned ones.
fn assignment_age_key(agent: &RegisteredAgent) -> DateTime<Utc> {
    agent
        .last_assigned()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn non_empty(value: String, error: AgentDomainError) -> Result<String, AgentDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}

fn parse_capabilities(raw: &[String]) -> Result<BTreeSet<AgentCapability>, AgentDomainError> {
    if raw.is_empty() {
        return Err(AgentDomainError::NoCapabilities);
    }
    raw.iter()
        .map(|value| AgentCapability::try_from(value.as_str()).map_err(AgentDomainError::from))
        .collect()
}
