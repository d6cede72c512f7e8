//! Conductor: multi-tenant agent orchestration core.
//!
//! This crate provides the scheduling and lifecycle core for a
//! multi-tenant agent platform: agent registration and routing, session
//! and task lifecycle management under per-tenant quotas, and a
//! fine-tuning pipeline fed by curated session outcomes.
//!
//! # Architecture
//!
//! Conductor follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory stores,
//!   simulated providers)
//!
//! # Modules
//!
//! - [`agent_registry`]: Agent registration, authentication, heartbeats,
//!   and capability-based routing
//! - [`session`]: Tenant quotas, session and task state machines, goal
//!   decomposition, and scoped contexts
//! - [`fine_tuning`]: Dataset curation and training job orchestration

pub mod agent_registry;
pub mod fine_tuning;
pub mod session;
