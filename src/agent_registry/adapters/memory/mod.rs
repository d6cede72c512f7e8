//! In-memory adapters for agent registry ports.

mod registry;

pub use registry::InMemoryAgentRepository;
