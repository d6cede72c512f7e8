//! Shared test helpers for in-memory integration tests.

use camino::Utf8PathBuf;
use conductor::session::{
    adapters::memory::{
        InMemorySessionRepository, InMemoryTaskRepository, InMemoryTenantRepository,
    },
    domain::{
        PersistedSessionData, SessionEntity, SessionId, SessionKind, SessionMetrics,
        SessionPriority, SessionStatus, Tenant, TenantId,
    },
    ports::{SessionRepository, TenantRepository},
    services::SessionLifecycleService,
};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use uuid::Uuid;

/// Session stores plus the lifecycle service wired over them.
pub struct SessionStack {
    pub sessions: Arc<InMemorySessionRepository>,
    pub tenants: Arc<InMemoryTenantRepository>,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub lifecycle: SessionLifecycleService<
        InMemorySessionRepository,
        InMemoryTenantRepository,
        InMemoryTaskRepository,
        DefaultClock,
    >,
}

/// Builds a fresh session stack over empty in-memory stores.
#[must_use]
pub fn session_stack() -> SessionStack {
    let sessions = Arc::new(InMemorySessionRepository::new());
    let tenants = Arc::new(InMemoryTenantRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let lifecycle = SessionLifecycleService::new(
        Arc::clone(&sessions),
        Arc::clone(&tenants),
        Arc::clone(&tasks),
        Arc::new(DefaultClock),
    );
    SessionStack {
        sessions,
        tenants,
        tasks,
        lifecycle,
    }
}

/// Stores a tenant with the given quota and returns its identifier.
pub async fn seed_tenant(stack: &SessionStack, max_concurrent_sessions: u32) -> TenantId {
    let tenant =
        Tenant::new("Acme Corp", "acme", max_concurrent_sessions).expect("valid tenant fields");
    let id = tenant.id();
    stack
        .tenants
        .save(&tenant)
        .await
        .expect("tenant insert should succeed");
    id
}

/// Stores a completed session with the given success rate and result.
pub async fn seed_completed_session(
    stack: &SessionStack,
    prompt: &str,
    success_rate: f64,
    result: serde_json::Value,
) -> SessionEntity {
    let timestamp = DefaultClock.utc();
    let session = SessionEntity::from_persisted(PersistedSessionData {
        id: SessionId::new(),
        tenant_id: TenantId::new(),
        title: "Finished session".to_owned(),
        status: SessionStatus::Completed,
        priority: SessionPriority::Normal,
        kind: SessionKind::Interactive,
        initial_prompt: prompt.to_owned(),
        metrics: SessionMetrics {
            success_rate,
            tasks_completed: 4,
            tasks_failed: 0,
            result: Some(result),
        },
        created_at: timestamp,
        updated_at: timestamp,
    });
    stack
        .sessions
        .save(&session)
        .await
        .expect("session insert should succeed");
    session
}

/// Creates a unique writable directory for dataset output.
#[must_use]
pub fn temp_output_dir() -> Utf8PathBuf {
    let dir = std::env::temp_dir().join(format!("conductor-{}", Uuid::new_v4().simple()));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    Utf8PathBuf::from_path_buf(dir).expect("temp dir should be utf-8")
}
