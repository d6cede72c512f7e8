//! Agent registration, liveness, and capability-based routing.
//!
//! This module tracks the pool of autonomous worker agents: registering
//! them with capability metadata and a generated authentication token,
//! recording heartbeat liveness and load reports, and answering routing
//! queries that select the least-loaded fresh agent holding a required
//! capability. The module follows hexagonal architecture:
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
