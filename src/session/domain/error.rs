//! Error types for session domain validation and parsing.

use super::context::ContextScope;
use super::session::SessionStatus;
use super::task::TaskStatus;
use thiserror::Error;

/// Errors returned while constructing or mutating session domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionDomainError {
    /// The session title is empty after trimming.
    #[error("session title must not be empty")]
    EmptyTitle,

    /// The session initial prompt is empty after trimming.
    #[error("session initial prompt must not be empty")]
    EmptyPrompt,

    /// The tenant slug is empty after trimming.
    #[error("tenant slug must not be empty")]
    EmptyTenantSlug,

    /// The tenant slug contains characters outside `[a-z0-9-]`.
    #[error(
        "tenant slug '{0}' contains invalid characters (only lowercase alphanumeric and hyphens allowed)"
    )]
    InvalidTenantSlug(String),

    /// The tenant name is empty after trimming.
    #[error("tenant name must not be empty")]
    EmptyTenantName,

    /// The requested session state change is not in the transition table.
    #[error("invalid session transition from {from} to {to}")]
    InvalidSessionTransition {
        /// State the session is currently in.
        from: SessionStatus,
        /// State the caller requested.
        to: SessionStatus,
    },

    /// The requested task state change is not in the transition table.
    #[error("invalid task transition from {from} to {to}")]
    InvalidTaskTransition {
        /// State the task is currently in.
        from: TaskStatus,
        /// State the caller requested.
        to: TaskStatus,
    },

    /// A goal description was empty, so nothing can be decomposed.
    #[error("goal description must not be empty")]
    EmptyGoal,

    /// Contexts of differing scopes cannot be merged.
    #[error("context scope mismatch: cannot merge {other} into {base}")]
    ContextScopeMismatch {
        /// Scope of the context being merged into.
        base: ContextScope,
        /// Scope of the context being merged from.
        other: ContextScope,
    },
}

/// Error returned while parsing session status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown session status: {0}")]
pub struct ParseSessionStatusError(pub String);

/// Error returned while parsing task status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task complexity from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task complexity: {0}")]
pub struct ParseTaskComplexityError(pub String);

/// Error returned while parsing context scope from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown context scope: {0}")]
pub struct ParseContextScopeError(pub String);
