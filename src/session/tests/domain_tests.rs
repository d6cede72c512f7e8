//! Unit tests for session domain types and state machines.

use crate::session::domain::{
    ContextScope, NewSessionParams, SessionDomainError, SessionEntity, SessionKind,
    SessionMetrics, SessionPriority, SessionStatus, Tenant, TaskStatus,
};
use mockable::DefaultClock;
use rstest::rstest;

fn test_session() -> SessionEntity {
    SessionEntity::new(
        NewSessionParams {
            tenant_id: crate::session::domain::TenantId::new(),
            title: "Ship the widget".to_owned(),
            initial_prompt: "Build the widget and test it".to_owned(),
            priority: SessionPriority::Normal,
            kind: SessionKind::Interactive,
        },
        &DefaultClock,
    )
    .expect("valid session params")
}

// ── Session state machine ──────────────────────────────────────────

#[rstest]
fn new_session_is_pending() {
    let session = test_session();
    assert_eq!(session.status(), SessionStatus::Pending);
    assert!(session.status().counts_against_quota());
}

#[rstest]
#[case(SessionStatus::Pending, SessionStatus::Active, true)]
#[case(SessionStatus::Pending, SessionStatus::Cancelled, true)]
#[case(SessionStatus::Pending, SessionStatus::Completed, false)]
#[case(SessionStatus::Pending, SessionStatus::Failed, false)]
#[case(SessionStatus::Active, SessionStatus::Completed, true)]
#[case(SessionStatus::Active, SessionStatus::Failed, true)]
#[case(SessionStatus::Active, SessionStatus::Cancelled, true)]
#[case(SessionStatus::Active, SessionStatus::Pending, false)]
#[case(SessionStatus::Completed, SessionStatus::Active, false)]
#[case(SessionStatus::Failed, SessionStatus::Pending, false)]
#[case(SessionStatus::Cancelled, SessionStatus::Active, false)]
fn session_transition_table(
    #[case] from: SessionStatus,
    #[case] to: SessionStatus,
    #[case] allowed: bool,
) {
    assert_eq!(from.can_transition_to(to), allowed);
}

#[rstest]
fn terminal_states_admit_no_transition(
    #[values(SessionStatus::Completed, SessionStatus::Failed, SessionStatus::Cancelled)]
    terminal: SessionStatus,
    #[values(
        SessionStatus::Pending,
        SessionStatus::Active,
        SessionStatus::Completed,
        SessionStatus::Failed,
        SessionStatus::Cancelled
    )]
    target: SessionStatus,
) {
    assert!(terminal.is_terminal());
    assert!(!terminal.can_transition_to(target));
}

#[rstest]
fn only_pending_and_active_count_against_quota() {
    assert!(SessionStatus::Pending.counts_against_quota());
    assert!(SessionStatus::Active.counts_against_quota());
    assert!(!SessionStatus::Completed.counts_against_quota());
    assert!(!SessionStatus::Failed.counts_against_quota());
    assert!(!SessionStatus::Cancelled.counts_against_quota());
}

#[rstest]
fn invalid_transition_leaves_session_unchanged() {
    let mut session = test_session();
    let before = session.clone();

    let result = session.transition_to(SessionStatus::Completed, &DefaultClock);

    assert!(matches!(
        result,
        Err(SessionDomainError::InvalidSessionTransition {
            from: SessionStatus::Pending,
            to: SessionStatus::Completed,
        })
    ));
    assert_eq!(session, before);
}

#[rstest]
fn valid_transition_chain_reaches_completed() {
    let mut session = test_session();
    session
        .transition_to(SessionStatus::Active, &DefaultClock)
        .expect("pending to active is valid");
    session
        .transition_to(SessionStatus::Completed, &DefaultClock)
        .expect("active to completed is valid");
    assert_eq!(session.status(), SessionStatus::Completed);
}

#[rstest]
#[case("", "a prompt", SessionDomainError::EmptyTitle)]
#[case("a title", "   ", SessionDomainError::EmptyPrompt)]
fn session_requires_title_and_prompt(
    #[case] title: &str,
    #[case] prompt: &str,
    #[case] expected: SessionDomainError,
) {
    let result = SessionEntity::new(
        NewSessionParams {
            tenant_id: crate::session::domain::TenantId::new(),
            title: title.to_owned(),
            initial_prompt: prompt.to_owned(),
            priority: SessionPriority::Normal,
            kind: SessionKind::Batch,
        },
        &DefaultClock,
    );
    assert_eq!(result.expect_err("should be rejected"), expected);
}

// ── Session metrics ────────────────────────────────────────────────

#[rstest]
fn metrics_track_success_rate() {
    let mut metrics = SessionMetrics::default();
    metrics.record_outcome(true, None);
    metrics.record_outcome(true, None);
    metrics.record_outcome(false, None);

    assert_eq!(metrics.tasks_completed, 2);
    assert_eq!(metrics.tasks_failed, 1);
    assert!((metrics.success_rate - 2.0 / 3.0).abs() < 1e-9);
}

#[rstest]
fn metrics_keep_latest_result_payload() {
    let mut metrics = SessionMetrics::default();
    metrics.record_outcome(true, Some(serde_json::json!({"answer": 1})));
    metrics.record_outcome(true, None);

    assert_eq!(metrics.result, Some(serde_json::json!({"answer": 1})));
}

// ── Task state machine ─────────────────────────────────────────────

#[rstest]
#[case(TaskStatus::Pending, TaskStatus::Assigned, true)]
#[case(TaskStatus::Pending, TaskStatus::Completed, true)]
#[case(TaskStatus::Pending, TaskStatus::Failed, true)]
#[case(TaskStatus::Assigned, TaskStatus::Completed, true)]
#[case(TaskStatus::Assigned, TaskStatus::Failed, true)]
#[case(TaskStatus::Assigned, TaskStatus::Pending, false)]
#[case(TaskStatus::Completed, TaskStatus::Failed, false)]
#[case(TaskStatus::Failed, TaskStatus::Assigned, false)]
fn task_transition_table(#[case] from: TaskStatus, #[case] to: TaskStatus, #[case] allowed: bool) {
    assert_eq!(from.can_transition_to(to), allowed);
}

// ── Tenant validation ──────────────────────────────────────────────

#[rstest]
fn tenant_slug_is_normalized() {
    let tenant = Tenant::new("Acme Corp", "  Acme-1  ", 5).expect("valid tenant");
    assert_eq!(tenant.slug(), "acme-1");
    assert_eq!(tenant.max_concurrent_sessions(), 5);
}

#[rstest]
#[case("", "acme")]
#[case("Acme", "")]
fn tenant_requires_name_and_slug(#[case] name: &str, #[case] slug: &str) {
    assert!(Tenant::new(name, slug, 5).is_err());
}

#[rstest]
fn tenant_slug_rejects_invalid_characters() {
    assert!(matches!(
        Tenant::new("Acme", "acme_corp", 5),
        Err(SessionDomainError::InvalidTenantSlug(_))
    ));
}

// ── Context scope ──────────────────────────────────────────────────

#[rstest]
#[case("session", ContextScope::Session)]
#[case("tenant", ContextScope::Tenant)]
#[case("global", ContextScope::Global)]
fn context_scope_parses_storage_form(#[case] input: &str, #[case] expected: ContextScope) {
    assert_eq!(ContextScope::try_from(input), Ok(expected));
}

#[rstest]
fn unknown_context_scope_is_rejected() {
    assert!(ContextScope::try_from("universe").is_err());
}
