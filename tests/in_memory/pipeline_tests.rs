//! Integration tests for the fine-tuning pipeline end to end.

use conductor::fine_tuning::{
    adapters::{SimulatedTrainingProvider, memory::InMemoryJobRepository},
    domain::FineTuningStatus,
    services::{FineTuningPipeline, SessionDatasetCurator},
};
use mockable::DefaultClock;
use rstest::rstest;
use std::sync::Arc;

use super::helpers::{seed_completed_session, session_stack, temp_output_dir};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_job_travels_from_pending_to_completed() {
    let stack = session_stack();
    seed_completed_session(
        &stack,
        "Build the widget",
        0.95,
        serde_json::json!("widget built"),
    )
    .await;
    let pipeline = FineTuningPipeline::new(
        Arc::new(InMemoryJobRepository::new()),
        Arc::new(SimulatedTrainingProvider::new()),
        Arc::new(SessionDatasetCurator::new(Arc::clone(&stack.sessions))),
        Arc::new(DefaultClock),
    );
    let output_dir = temp_output_dir();

    let job = pipeline
        .create_job("base-7b", "tuned-7b")
        .await
        .expect("job creation should succeed");
    assert_eq!(job.status(), FineTuningStatus::Pending);
    assert!(job.external_job_id().is_none());

    let started = pipeline
        .start_pipeline(job.id(), &output_dir)
        .await
        .expect("pipeline start should succeed");
    assert_eq!(started.status(), FineTuningStatus::Running);
    assert!(started.external_job_id().is_some());
    assert!(started.dataset_path().is_some());

    let mut polls = 0;
    loop {
        let updated = pipeline.poll_jobs().await.expect("poll should succeed");
        polls += 1;
        if updated == 0 {
            break;
        }
        assert!(polls < 10, "the simulated provider finishes in four polls");
    }

    let finished = pipeline
        .find_job(job.id())
        .await
        .expect("lookup should succeed")
        .expect("job should exist");
    assert_eq!(finished.status(), FineTuningStatus::Completed);
    assert_eq!(
        finished.metrics(),
        Some(&SimulatedTrainingProvider::final_metrics())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_job_without_training_data_stays_pending() {
    let stack = session_stack();
    let pipeline = FineTuningPipeline::new(
        Arc::new(InMemoryJobRepository::new()),
        Arc::new(SimulatedTrainingProvider::new()),
        Arc::new(SessionDatasetCurator::new(Arc::clone(&stack.sessions))),
        Arc::new(DefaultClock),
    );
    let output_dir = temp_output_dir();

    let job = pipeline
        .create_job("base-7b", "tuned-7b")
        .await
        .expect("job creation should succeed");
    let deferred = pipeline
        .start_pipeline(job.id(), &output_dir)
        .await
        .expect("deferred start should not error");

    assert_eq!(deferred.status(), FineTuningStatus::Pending);
    assert!(deferred.external_job_id().is_none());

    let updated = pipeline.poll_jobs().await.expect("poll should succeed");
    assert_eq!(updated, 0, "a pending job is not polled");
}
