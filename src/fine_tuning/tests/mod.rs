//! Unit tests for the fine-tuning context.
#![expect(
    clippy::expect_used,
    reason = "tests fail loudly when fixtures cannot be built"
)]

mod pipeline_tests;
