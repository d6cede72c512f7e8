//! Unit tests for the session context.
#![expect(
    clippy::expect_used,
    reason = "tests fail loudly when fixtures cannot be built"
)]

mod context_tests;
mod domain_tests;
