//! Adapter implementations for agent registry ports.

pub mod memory;
