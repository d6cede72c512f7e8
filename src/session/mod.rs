//! Session lifecycle, tenant quotas, and task decomposition.
//!
//! This module owns the tenant-facing unit of work: creating sessions
//! under per-tenant concurrency quotas, enforcing the session and task
//! state machines, decomposing session goals into routable tasks, and
//! managing scoped session contexts. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
