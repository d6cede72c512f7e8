//! Deterministic goal analysis and task decomposition.
//!
//! Complexity scoring and the decomposition rule table contain no
//! randomness or clock-dependent decisions: identical goal text always
//! yields the same complexity and the same ordered task sequence.

use crate::agent_registry::domain::AgentCapability;
use crate::session::{
    domain::{NewTaskParams, SessionDomainError, SessionEntity, TaskComplexity, TaskEntity},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Words that signal a goal spans multiple concerns.
const SCOPE_KEYWORDS: [&str; 8] = [
    "and",
    "then",
    "also",
    "integrate",
    "migrate",
    "refactor",
    "redesign",
    "across",
];

/// One row of the decomposition rule table.
struct TaskBlueprint {
    title: &'static str,
    capability: AgentCapability,
    priority: u8,
    effort_minutes: u32,
}

const TRIVIAL_PLAN: &[TaskBlueprint] = &[TaskBlueprint {
    title: "Implement the goal",
    capability: AgentCapability::CodeGeneration,
    priority: 5,
    effort_minutes: 15,
}];

const SIMPLE_PLAN: &[TaskBlueprint] = &[
    TaskBlueprint {
        title: "Implement the goal",
        capability: AgentCapability::CodeGeneration,
        priority: 6,
        effort_minutes: 30,
    },
    TaskBlueprint {
        title: "Write tests for the change",
        capability: AgentCapability::TestGeneration,
        priority: 4,
        effort_minutes: 20,
    },
];

const MODERATE_PLAN: &[TaskBlueprint] = &[
    TaskBlueprint {
        title: "Analyse requirements",
        capability: AgentCapability::Analysis,
        priority: 8,
        effort_minutes: 20,
    },
    TaskBlueprint {
        title: "Implement the goal",
        capability: AgentCapability::CodeGeneration,
        priority: 6,
        effort_minutes: 60,
    },
    TaskBlueprint {
        title: "Write tests for the change",
        capability: AgentCapability::TestGeneration,
        priority: 4,
        effort_minutes: 30,
    },
];

const COMPLEX_PLAN: &[TaskBlueprint] = &[
    TaskBlueprint {
        title: "Analyse requirements",
        capability: AgentCapability::Analysis,
        priority: 9,
        effort_minutes: 45,
    },
    TaskBlueprint {
        title: "Implement the goal",
        capability: AgentCapability::CodeGeneration,
        priority: 7,
        effort_minutes: 120,
    },
    TaskBlueprint {
        title: "Write tests for the change",
        capability: AgentCapability::TestGeneration,
        priority: 5,
        effort_minutes: 60,
    },
    TaskBlueprint {
        title: "Review the changes",
        capability: AgentCapability::CodeReview,
        priority: 3,
        effort_minutes: 30,
    },
    TaskBlueprint {
        title: "Document the outcome",
        capability: AgentCapability::Documentation,
        priority: 2,
        effort_minutes: 20,
    },
];

/// Service-level errors for task decomposition.
#[derive(Debug, Error)]
pub enum TaskDecompositionError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] SessionDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task decomposition operations.
pub type TaskDecompositionResult<T> = Result<T, TaskDecompositionError>;

/// Goal analysis and decomposition service.
#[derive(Clone)]
pub struct TaskDecomposer<K, C>
where
    K: TaskRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<K>,
    clock: Arc<C>,
}

impl<K, C> TaskDecomposer<K, C>
where
    K: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task decomposer.
    #[must_use]
    pub const fn new(tasks: Arc<K>, clock: Arc<C>) -> Self {
        Self { tasks, clock }
    }

    /// Scores a goal description into an ordinal complexity level.
    ///
    /// Scoring considers trimmed length, scope keywords, and structural
    /// cues (multiple lines, multiple sentences). The function is pure.
    #[must_use]
    pub fn analyze_complexity(goal: &str) -> TaskComplexity {
        let trimmed = goal.trim();
        let score = length_points(trimmed) + keyword_points(trimmed) + structure_points(trimmed);
        match score {
            0..=1 => TaskComplexity::Trivial,
            2..=3 => TaskComplexity::Simple,
            4..=5 => TaskComplexity::Moderate,
            _ => TaskComplexity::Complex,
        }
    }

    /// Decomposes a session's goal into persisted, ordered tasks.
    ///
    /// Produces at least one task for any non-empty goal; the rule table
    /// keyed by complexity decides the sequence, capabilities, and
    /// priorities.
    ///
    /// # Errors
    ///
    /// Returns [`SessionDomainError::EmptyGoal`] (wrapped) when the goal
    /// is empty after trimming, or a repository error when persistence
    /// fails.
    pub async fn decompose_session(
        &self,
        session: &SessionEntity,
    ) -> TaskDecompositionResult<Vec<TaskEntity>> {
        let goal = session.initial_prompt().trim();
        if goal.is_empty() {
            return Err(SessionDomainError::EmptyGoal.into());
        }

        let complexity = Self::analyze_complexity(goal);
        let tasks: Vec<TaskEntity> = plan_for(complexity)
            .iter()
            .map(|blueprint| {
                TaskEntity::new(
                    NewTaskParams {
                        session_id: session.id(),
                        title: blueprint.title.to_owned(),
                        complexity,
                        priority: blueprint.priority,
                        required_capability: blueprint.capability,
                        estimated_effort_minutes: blueprint.effort_minutes,
                    },
                    &*self.clock,
                )
            })
            .collect();

        self.tasks.save_all(&tasks).await?;
        Ok(tasks)
    }
}

const fn plan_for(complexity: TaskComplexity) -> &'static [TaskBlueprint] {
    match complexity {
        TaskComplexity::Trivial => TRIVIAL_PLAN,
        TaskComplexity::Simple => SIMPLE_PLAN,
        TaskComplexity::Moderate => MODERATE_PLAN,
        TaskComplexity::Complex => COMPLEX_PLAN,
    }
}

fn length_points(goal: &str) -> u32 {
    match goal.chars().count() {
        0..=40 => 0,
        41..=200 => 1,
        201..=600 => 2,
        _ => 3,
    }
}

fn keyword_points(goal: &str) -> u32 {
    let lowered = goal.to_ascii_lowercase();
    let hits = lowered
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|word| SCOPE_KEYWORDS.contains(word))
        .count();
    match hits {
        0 => 0,
        1..=2 => 1,
        _ => 2,
    }
}

fn structure_points(goal: &str) -> u32 {
    let mut points = 0;
    if goal.lines().count() > 1 {
        points += 1;
    }
    if goal.matches(['.', '!', '?']).count() > 1 {
        points += 1;
    }
    points
}
