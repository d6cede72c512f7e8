//! Unit tests for scoped session context management.

use std::sync::Arc;

use crate::session::{
    adapters::memory::InMemoryContextRepository,
    domain::{ContextId, ContextScope, SessionDomainError, SessionId},
    services::{ContextServiceError, SessionContextService},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = SessionContextService<InMemoryContextRepository, DefaultClock>;

struct Harness {
    service: TestService,
}

#[fixture]
fn harness() -> Harness {
    let contexts = Arc::new(InMemoryContextRepository::new());
    let service = SessionContextService::new(contexts, Arc::new(DefaultClock));
    Harness { service }
}

fn payload(entries: &[(&str, serde_json::Value)]) -> serde_json::Map<String, serde_json::Value> {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_owned(), value.clone()))
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_context_round_trips(harness: Harness) {
    let session_id = SessionId::new();
    let entries = payload(&[("branch", serde_json::json!("main"))]);

    let created = harness
        .service
        .create_context(session_id, ContextScope::Session, entries.clone())
        .await
        .expect("creation should succeed");

    let fetched = harness
        .service
        .get_context(created.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(fetched, created);
    assert_eq!(fetched.session_id(), session_id);
    assert_eq!(fetched.payload(), &entries);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_context_is_reported(harness: Harness) {
    let missing = ContextId::new();

    let result = harness.service.get_context(missing).await;

    assert!(matches!(
        result,
        Err(ContextServiceError::ContextNotFound(id)) if id == missing
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn merge_overlays_source_keys_onto_the_base(harness: Harness) {
    let session_id = SessionId::new();
    let base = harness
        .service
        .create_context(
            session_id,
            ContextScope::Session,
            payload(&[
                ("branch", serde_json::json!("main")),
                ("retries", serde_json::json!(1)),
            ]),
        )
        .await
        .expect("creation should succeed");
    let other = harness
        .service
        .create_context(
            session_id,
            ContextScope::Session,
            payload(&[
                ("retries", serde_json::json!(3)),
                ("reviewer", serde_json::json!("rhea")),
            ]),
        )
        .await
        .expect("creation should succeed");

    let merged = harness
        .service
        .merge_contexts(base.id(), other.id())
        .await
        .expect("merge should succeed");

    let expected = payload(&[
        ("branch", serde_json::json!("main")),
        ("retries", serde_json::json!(3)),
        ("reviewer", serde_json::json!("rhea")),
    ]);
    assert_eq!(merged.payload(), &expected);

    let stored_base = harness
        .service
        .get_context(base.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(stored_base, merged);

    let stored_other = harness
        .service
        .get_context(other.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(stored_other.payload(), other.payload(), "source is untouched");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn merge_rejects_mismatched_scopes(harness: Harness) {
    let session_id = SessionId::new();
    let base = harness
        .service
        .create_context(
            session_id,
            ContextScope::Session,
            payload(&[("branch", serde_json::json!("main"))]),
        )
        .await
        .expect("creation should succeed");
    let other = harness
        .service
        .create_context(
            session_id,
            ContextScope::Tenant,
            payload(&[("region", serde_json::json!("eu-west-1"))]),
        )
        .await
        .expect("creation should succeed");

    let result = harness.service.merge_contexts(base.id(), other.id()).await;

    assert!(matches!(
        result,
        Err(ContextServiceError::Domain(
            SessionDomainError::ContextScopeMismatch {
                base: ContextScope::Session,
                other: ContextScope::Tenant,
            }
        ))
    ));
    let stored_base = harness
        .service
        .get_context(base.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(stored_base.payload(), base.payload(), "base is unchanged");
}
