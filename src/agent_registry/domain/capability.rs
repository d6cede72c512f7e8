//! Enumerated agent capability tags.

use super::ParseAgentCapabilityError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Skill tag used to match tasks to agents.
///
/// Capabilities form a closed set; registration requests carrying an
/// unknown capability string fail validation rather than being stored
/// as opaque text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentCapability {
    /// Producing new source code from a task description.
    CodeGeneration,
    /// Producing automated tests for existing code.
    TestGeneration,
    /// Reviewing proposed changes.
    CodeReview,
    /// Writing or updating documentation.
    Documentation,
    /// Restructuring existing code without behaviour change.
    Refactoring,
    /// Investigating a goal before implementation work starts.
    Analysis,
}

impl AgentCapability {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CodeGeneration => "code_generation",
            Self::TestGeneration => "test_generation",
            Self::CodeReview => "code_review",
            Self::Documentation => "documentation",
            Self::Refactoring => "refactoring",
            Self::Analysis => "analysis",
        }
    }
}

impl fmt::Display for AgentCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgentCapability {
    type Error = ParseAgentCapabilityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "code_generation" => Ok(Self::CodeGeneration),
            "test_generation" => Ok(Self::TestGeneration),
            "code_review" => Ok(Self::CodeReview),
            "documentation" => Ok(Self::Documentation),
            "refactoring" => Ok(Self::Refactoring),
            "analysis" => Ok(Self::Analysis),
            _ => Err(ParseAgentCapabilityError(value.to_owned())),
        }
    }
}
