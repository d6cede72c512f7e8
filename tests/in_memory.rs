//! In-memory adapter integration tests.
//!
//! Tests are organized into modules by functionality:
//! - `registry_tests`: Registration, heartbeat authentication, routing
//! - `quota_tests`: Session lifecycle under per-tenant quotas
//! - `curation_tests`: Dataset curation from completed sessions
//! - `pipeline_tests`: Fine-tuning job orchestration end to end

mod in_memory {
    pub mod helpers;

    mod curation_tests;
    mod pipeline_tests;
    mod quota_tests;
    mod registry_tests;
}
