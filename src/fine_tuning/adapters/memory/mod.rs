//! In-memory adapters for fine-tuning ports.

mod jobs;

pub use jobs::InMemoryJobRepository;
