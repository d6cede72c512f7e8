//! Integration tests for dataset curation from completed sessions.

use conductor::fine_tuning::{
    ports::DatasetCurator,
    services::{DEFAULT_MIN_SUCCESS_RATE, SessionDatasetCurator},
};
use rstest::rstest;
use std::sync::Arc;

use super::helpers::{seed_completed_session, session_stack, temp_output_dir};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_sessions_above_the_threshold_are_curated() {
    let stack = session_stack();
    seed_completed_session(
        &stack,
        "Build the widget",
        0.95,
        serde_json::json!("widget built"),
    )
    .await;
    seed_completed_session(
        &stack,
        "Flaky attempt",
        0.8,
        serde_json::json!("partial work"),
    )
    .await;
    let curator = SessionDatasetCurator::new(Arc::clone(&stack.sessions));
    let output_dir = temp_output_dir();

    let path = curator
        .curate(&output_dir, DEFAULT_MIN_SUCCESS_RATE)
        .await
        .expect("curation should succeed")
        .expect("one qualifying session should produce a file");

    let contents = std::fs::read_to_string(&path).expect("dataset file should be readable");
    let records: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line should be valid JSON"))
        .collect();
    assert_eq!(
        records,
        vec![serde_json::json!({
            "instruction": "Build the widget",
            "output": "widget built",
        })]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn curation_without_qualifying_sessions_yields_nothing() {
    let stack = session_stack();
    seed_completed_session(&stack, "Weak run", 0.5, serde_json::json!("noise")).await;
    let curator = SessionDatasetCurator::new(Arc::clone(&stack.sessions));
    let output_dir = temp_output_dir();

    let path = curator
        .curate(&output_dir, DEFAULT_MIN_SUCCESS_RATE)
        .await
        .expect("curation should succeed");

    assert!(path.is_none());
}
