//! Integration tests for session lifecycle under per-tenant quotas.

use conductor::session::{
    domain::{SessionStatus, TaskStatus},
    services::{CreateSessionRequest, SessionLifecycleError, TaskResultReport},
};
use rstest::rstest;

use super::helpers::{seed_tenant, session_stack};

fn request(title: &str) -> CreateSessionRequest {
    CreateSessionRequest::new(title, "Refactor the ingestion pipeline and add tests")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tenant_at_quota_cannot_open_a_third_session() {
    let stack = session_stack();
    let tenant_id = seed_tenant(&stack, 2).await;

    stack
        .lifecycle
        .create_session(tenant_id, request("First"))
        .await
        .expect("first session fits the quota");
    stack
        .lifecycle
        .create_session(tenant_id, request("Second"))
        .await
        .expect("second session fits the quota");
    let third = stack
        .lifecycle
        .create_session(tenant_id, request("Third"))
        .await;

    match third {
        Err(SessionLifecycleError::QuotaExceeded {
            tenant_id: reported,
            limit,
        }) => {
            assert_eq!(reported, tenant_id);
            assert_eq!(limit, 2);
        }
        other => panic!("expected quota rejection, got {other:?}"),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_session_runs_from_creation_to_completion() {
    let stack = session_stack();
    let tenant_id = seed_tenant(&stack, 2).await;

    let session = stack
        .lifecycle
        .create_session(tenant_id, request("Full run"))
        .await
        .expect("session creation should succeed");
    assert_eq!(session.status(), SessionStatus::Pending);

    let decomposer = conductor::session::services::TaskDecomposer::new(
        std::sync::Arc::clone(&stack.tasks),
        std::sync::Arc::new(mockable::DefaultClock),
    );
    let tasks = decomposer
        .decompose_session(&session)
        .await
        .expect("decomposition should succeed");
    assert!(!tasks.is_empty());

    stack
        .lifecycle
        .transition(session.id(), SessionStatus::Active)
        .await
        .expect("activation should succeed");

    for task in &tasks {
        stack
            .lifecycle
            .record_result(
                task.id(),
                TaskResultReport::new(true).with_output(serde_json::json!("done")),
            )
            .await
            .expect("result recording should succeed");
    }

    let finished = stack
        .lifecycle
        .transition(session.id(), SessionStatus::Completed)
        .await
        .expect("completion should succeed");
    assert_eq!(finished.status(), SessionStatus::Completed);
    assert!((finished.metrics().success_rate - 1.0).abs() < f64::EPSILON);

    let stored_tasks = stack
        .lifecycle
        .list_tasks(session.id())
        .await
        .expect("listing should succeed");
    assert!(stored_tasks
        .iter()
        .all(|task| task.status() == TaskStatus::Completed));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn finished_sessions_return_quota_capacity() {
    let stack = session_stack();
    let tenant_id = seed_tenant(&stack, 1).await;

    let first = stack
        .lifecycle
        .create_session(tenant_id, request("First"))
        .await
        .expect("first session fits the quota");
    stack
        .lifecycle
        .transition(first.id(), SessionStatus::Active)
        .await
        .expect("activation should succeed");
    stack
        .lifecycle
        .transition(first.id(), SessionStatus::Failed)
        .await
        .expect("failure transition should succeed");

    stack
        .lifecycle
        .create_session(tenant_id, request("Second"))
        .await
        .expect("capacity should be free after the first session ended");
}
