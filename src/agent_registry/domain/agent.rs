//! Registered agent aggregate root.

use super::{AgentCapability, AgentDomainError, AgentId, AuthToken, ParseAgentStatusError};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Maximum stored length of an agent type string.
const MAX_AGENT_TYPE_LEN: usize = 100;

/// Validated agent type string.
///
/// Agent types are lowercase snake-case identifiers such as
/// `code_assistant`; input is trimmed and lowercased before validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentType(String);

impl AgentType {
    /// Creates a validated agent type from raw input.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError`] when the input is empty, too long,
    /// or contains characters outside `[a-z0-9_]`.
    pub fn new(raw: impl Into<String>) -> Result<Self, AgentDomainError> {
        let normalized = raw.into().trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(AgentDomainError::EmptyAgentType);
        }
        if normalized.len() > MAX_AGENT_TYPE_LEN {
            return Err(AgentDomainError::AgentTypeTooLong(normalized));
        }
        if !normalized
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_')
        {
            return Err(AgentDomainError::InvalidAgentType(normalized));
        }
        Ok(Self(normalized))
    }

    /// Returns the agent type as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Administrative status of a registered agent.
///
/// A stale heartbeat does not change this status; staleness is derived
/// from timestamps at routing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// The agent is eligible for routing.
    Active,
    /// The agent has been administratively removed from routing.
    Inactive,
}

impl AgentStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgentStatus {
    type Error = ParseAgentStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(ParseAgentStatusError(value.to_owned())),
        }
    }
}

/// Declared performance tier of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    /// Best-effort tier for low-priority work.
    Basic,
    /// Default tier.
    Standard,
    /// Tier reserved for latency-sensitive work.
    Premium,
}

/// Registered agent aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredAgent {
    id: AgentId,
    agent_type: AgentType,
    version: String,
    endpoint: String,
    capabilities: BTreeSet<AgentCapability>,
    performance_tier: PerformanceTier,
    status: AgentStatus,
    current_load: u32,
    auth_token: AuthToken,
    heartbeat_interval_seconds: u32,
    last_heartbeat: DateTime<Utc>,
    last_assigned: Option<DateTime<Utc>>,
    metadata: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAgentData {
    /// Persisted agent identifier.
    pub id: AgentId,
    /// Persisted agent type.
    pub agent_type: AgentType,
    /// Persisted agent software version.
    pub version: String,
    /// Persisted callback endpoint.
    pub endpoint: String,
    /// Persisted capability set.
    pub capabilities: BTreeSet<AgentCapability>,
    /// Persisted performance tier.
    pub performance_tier: PerformanceTier,
    /// Persisted administrative status.
    pub status: AgentStatus,
    /// Persisted load figure.
    pub current_load: u32,
    /// Persisted authentication token.
    pub auth_token: AuthToken,
    /// Persisted heartbeat interval in seconds.
    pub heartbeat_interval_seconds: u32,
    /// Persisted last-heartbeat timestamp.
    pub last_heartbeat: DateTime<Utc>,
    /// Persisted last-assignment timestamp, if any.
    pub last_assigned: Option<DateTime<Utc>>,
    /// Persisted free-form metadata.
    pub metadata: Option<serde_json::Value>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Construction parameters for a new agent registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAgentParams {
    /// Validated agent type.
    pub agent_type: AgentType,
    /// Agent software version.
    pub version: String,
    /// Callback endpoint URL.
    pub endpoint: String,
    /// Declared capability set.
    pub capabilities: BTreeSet<AgentCapability>,
    /// Declared performance tier.
    pub performance_tier: PerformanceTier,
    /// Recommended heartbeat interval in seconds.
    pub heartbeat_interval_seconds: u32,
    /// Free-form registration metadata.
    pub metadata: Option<serde_json::Value>,
}

impl RegisteredAgent {
    /// Creates a new agent registration with a freshly generated token.
    ///
    /// The registration timestamp doubles as the initial heartbeat so a
    /// newly registered agent is immediately routable.
    #[must_use]
    pub fn new(params: NewAgentParams, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: AgentId::new(),
            agent_type: params.agent_type,
            version: params.version,
            endpoint: params.endpoint,
            capabilities: params.capabilities,
            performance_tier: params.performance_tier,
            status: AgentStatus::Active,
            current_load: 0,
            auth_token: AuthToken::generate(),
            heartbeat_interval_seconds: params.heartbeat_interval_seconds,
            last_heartbeat: timestamp,
            last_assigned: None,
            metadata: params.metadata,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an agent from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAgentData) -> Self {
        Self {
            id: data.id,
            agent_type: data.agent_type,
            version: data.version,
            endpoint: data.endpoint,
            capabilities: data.capabilities,
            performance_tier: data.performance_tier,
            status: data.status,
            current_load: data.current_load,
            auth_token: data.auth_token,
            heartbeat_interval_seconds: data.heartbeat_interval_seconds,
            last_heartbeat: data.last_heartbeat,
            last_assigned: data.last_assigned,
            metadata: data.metadata,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the agent identifier.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Returns the agent type.
    #[must_use]
    pub const fn agent_type(&self) -> &AgentType {
        &self.agent_type
    }

    /// Returns the agent software version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the callback endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the declared capability set.
    #[must_use]
    pub const fn capabilities(&self) -> &BTreeSet<AgentCapability> {
        &self.capabilities
    }

    /// Returns the declared performance tier.
    #[must_use]
    pub const fn performance_tier(&self) -> PerformanceTier {
        self.performance_tier
    }

    /// Returns the administrative status.
    #[must_use]
    pub const fn status(&self) -> AgentStatus {
        self.status
    }

    /// Returns the current load figure.
    #[must_use]
    pub const fn current_load(&self) -> u32 {
        self.current_load
    }

    /// Returns the authentication token.
    #[must_use]
    pub const fn auth_token(&self) -> &AuthToken {
        &self.auth_token
    }

    /// Returns the recommended heartbeat interval in seconds.
    #[must_use]
    pub const fn heartbeat_interval_seconds(&self) -> u32 {
        self.heartbeat_interval_seconds
    }

    /// Returns the last-heartbeat timestamp.
    #[must_use]
    pub const fn last_heartbeat(&self) -> DateTime<Utc> {
        self.last_heartbeat
    }

    /// Returns the last-assignment timestamp, if any task was routed.
    #[must_use]
    pub const fn last_assigned(&self) -> Option<DateTime<Utc>> {
        self.last_assigned
    }

    /// Returns the free-form registration metadata.
    #[must_use]
    pub const fn metadata(&self) -> Option<&serde_json::Value> {
        self.metadata.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether this agent declares the given capability.
    #[must_use]
    pub fn has_capability(&self, capability: AgentCapability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Returns whether the agent has missed its heartbeat window.
    ///
    /// A stale agent is excluded from routing but not deleted.
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        let window = Duration::seconds(i64::from(self.heartbeat_interval_seconds));
        now.signed_duration_since(self.last_heartbeat) > window
    }

    /// Records a heartbeat, refreshing liveness and the load figure.
    pub fn record_heartbeat(&mut self, current_load: u32, clock: &impl Clock) {
        self.current_load = current_load;
        self.last_heartbeat = clock.utc();
        self.touch(clock);
    }

    /// Records a routing assignment, bumping load and the assignment
    /// timestamp used for tie-breaking.
    pub fn record_assignment(&mut self, clock: &impl Clock) {
        self.current_load = self.current_load.saturating_add(1);
        self.last_assigned = Some(clock.utc());
        self.touch(clock);
    }

    /// Deactivates the agent, removing it from routing.
    pub fn deactivate(&mut self, clock: &impl Clock) {
        self.status = AgentStatus::Inactive;
        self.touch(clock);
    }

    /// Reactivates the agent.
    pub fn activate(&mut self, clock: &impl Clock) {
        self.status = AgentStatus::Active;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
