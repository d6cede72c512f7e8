//! Error types for agent registry domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing agent domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentDomainError {
    /// The agent type is empty after trimming.
    #[error("agent type must not be empty")]
    EmptyAgentType,

    /// The agent type contains characters outside `[a-z0-9_]`.
    #[error(
        "agent type '{0}' contains invalid characters (only lowercase alphanumeric and underscores allowed)"
    )]
    InvalidAgentType(String),

    /// The agent type exceeds the 100-character storage limit.
    #[error("agent type exceeds 100 character limit: {0}")]
    AgentTypeTooLong(String),

    /// The agent version is empty after trimming.
    #[error("agent version must not be empty")]
    EmptyVersion,

    /// The agent endpoint URL is empty after trimming.
    #[error("agent endpoint must not be empty")]
    EmptyEndpoint,

    /// The registration declared no capabilities.
    #[error("agent must declare at least one capability")]
    NoCapabilities,

    /// A declared capability is not in the known capability set.
    #[error(transparent)]
    UnknownCapability(#[from] ParseAgentCapabilityError),
}

/// Error returned while parsing capability tags.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent capability: {0}")]
pub struct ParseAgentCapabilityError(pub String);

/// Error returned while parsing agent status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent status: {0}")]
pub struct ParseAgentStatusError(pub String);
