//! Unit tests for the agent registry context.
#![expect(
    clippy::expect_used,
    reason = "tests fail loudly when fixtures cannot be built"
)]
