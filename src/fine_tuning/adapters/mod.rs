//! Adapter implementations for fine-tuning ports.

pub mod memory;
mod simulated;

pub use simulated::SimulatedTrainingProvider;
