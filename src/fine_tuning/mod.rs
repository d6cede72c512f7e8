//! Fine-tuning pipeline: dataset curation, training job lifecycle, and
//! provider polling.
//!
//! Completed sessions that meet a success-rate threshold are curated into
//! a JSONL training dataset, handed to a training provider, and tracked
//! through a strictly monotonic job state machine until the provider
//! reports a terminal result. The module follows hexagonal architecture:
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
