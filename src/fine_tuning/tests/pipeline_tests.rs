//! Unit tests for fine-tuning pipeline orchestration.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::fine_tuning::{
    adapters::{SimulatedTrainingProvider, memory::InMemoryJobRepository},
    domain::{
        FineTuningDomainError, FineTuningJob, FineTuningStatus, JobId, METADATA_DEFERRED_REASON,
        METADATA_FAILURE_REASON, METADATA_PROGRESS, PersistedJobData, TrainingMetrics,
    },
    ports::{
        JobRepository, TrainingProvider, TrainingProviderError, TrainingProviderResult,
        TrainingState, TrainingStatusReport,
    },
    services::{FineTuningPipeline, PipelineError, SessionDatasetCurator},
};
use crate::session::{
    adapters::memory::InMemorySessionRepository,
    domain::{
        PersistedSessionData, SessionEntity, SessionId, SessionKind, SessionMetrics,
        SessionPriority, SessionStatus, TenantId,
    },
    ports::SessionRepository,
};
use camino::{Utf8Path, Utf8PathBuf};
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};
use uuid::Uuid;

type TestCurator = SessionDatasetCurator<InMemorySessionRepository>;
type SimulatedPipeline =
    FineTuningPipeline<InMemoryJobRepository, SimulatedTrainingProvider, TestCurator, DefaultClock>;

struct Harness {
    sessions: Arc<InMemorySessionRepository>,
    jobs: Arc<InMemoryJobRepository>,
    pipeline: SimulatedPipeline,
    output_dir: Utf8PathBuf,
}

#[fixture]
fn harness() -> Harness {
    let sessions = Arc::new(InMemorySessionRepository::new());
    let jobs = Arc::new(InMemoryJobRepository::new());
    let curator = Arc::new(SessionDatasetCurator::new(Arc::clone(&sessions)));
    let pipeline = FineTuningPipeline::new(
        Arc::clone(&jobs),
        Arc::new(SimulatedTrainingProvider::new()),
        curator,
        Arc::new(DefaultClock),
    );
    let output_dir = temp_output_dir();
    Harness {
        sessions,
        jobs,
        pipeline,
        output_dir,
    }
}

fn temp_output_dir() -> Utf8PathBuf {
    let dir = std::env::temp_dir().join(format!("pipeline-{}", Uuid::new_v4().simple()));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    Utf8PathBuf::from_path_buf(dir).expect("temp dir should be utf-8")
}

/// Seeds one completed session strong enough to pass curation.
async fn seed_qualifying_session(harness: &Harness) {
    let timestamp = DefaultClock.utc();
    let session = SessionEntity::from_persisted(PersistedSessionData {
        id: SessionId::new(),
        tenant_id: TenantId::new(),
        title: "Finished session".to_owned(),
        status: SessionStatus::Completed,
        priority: SessionPriority::Normal,
        kind: SessionKind::Interactive,
        initial_prompt: "Build the widget".to_owned(),
        metrics: SessionMetrics {
            success_rate: 0.95,
            tasks_completed: 4,
            tasks_failed: 0,
            result: Some(serde_json::json!("widget built")),
        },
        created_at: timestamp,
        updated_at: timestamp,
    });
    harness
        .sessions
        .save(&session)
        .await
        .expect("session insert should succeed");
}

async fn create_job(harness: &Harness) -> FineTuningJob {
    harness
        .pipeline
        .create_job("base-7b", "tuned-7b")
        .await
        .expect("job creation should succeed")
}

async fn start_running_job(harness: &Harness) -> FineTuningJob {
    seed_qualifying_session(harness).await;
    let job = create_job(harness).await;
    harness
        .pipeline
        .start_pipeline(job.id(), &harness.output_dir)
        .await
        .expect("pipeline start should succeed")
}

fn running_job(external_job_id: &str) -> FineTuningJob {
    let timestamp = DefaultClock.utc();
    FineTuningJob::from_persisted(PersistedJobData {
        id: JobId::new(),
        base_model: "base-7b".to_owned(),
        target_model_name: "tuned-7b".to_owned(),
        status: FineTuningStatus::Running,
        dataset_path: Some(Utf8PathBuf::from("/tmp/dataset.jsonl")),
        external_job_id: Some(external_job_id.to_owned()),
        metrics: None,
        metadata: BTreeMap::new(),
        created_at: timestamp,
        updated_at: timestamp,
    })
}

fn sample_metrics() -> TrainingMetrics {
    TrainingMetrics {
        final_loss: 0.08,
        trained_steps: 500,
        epochs: 2,
    }
}

mockall::mock! {
    Provider {}

    #[async_trait::async_trait]
    impl TrainingProvider for Provider {
        async fn submit(
            &self,
            dataset_path: &Utf8Path,
            base_model: &str,
            target_model_name: &str,
        ) -> TrainingProviderResult<String>;

        async fn get_status(
            &self,
            external_job_id: &str,
        ) -> TrainingProviderResult<TrainingStatusReport>;
    }
}

// ── Job creation ───────────────────────────────────────────────────

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_job_is_pending_and_persisted(harness: Harness) {
    let job = create_job(&harness).await;

    assert_eq!(job.status(), FineTuningStatus::Pending);
    let stored = harness
        .pipeline
        .find_job(job.id())
        .await
        .expect("lookup should succeed")
        .expect("job should be stored");
    assert_eq!(stored, job);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creation_rejects_empty_base_model(harness: Harness) {
    let result = harness.pipeline.create_job("  ", "tuned-7b").await;

    assert!(matches!(
        result,
        Err(PipelineError::Domain(FineTuningDomainError::EmptyBaseModel))
    ));
}

// ── Pipeline start ─────────────────────────────────────────────────

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_rejects_unknown_job(harness: Harness) {
    let missing = JobId::new();

    let result = harness
        .pipeline
        .start_pipeline(missing, &harness.output_dir)
        .await;

    assert!(matches!(
        result,
        Err(PipelineError::JobNotFound(id)) if id == missing
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_without_qualifying_sessions_defers(harness: Harness) {
    let job = create_job(&harness).await;

    let deferred = harness
        .pipeline
        .start_pipeline(job.id(), &harness.output_dir)
        .await
        .expect("deferred start should not error");

    assert_eq!(deferred.status(), FineTuningStatus::Pending);
    assert!(deferred.external_job_id().is_none());
    assert!(deferred.metadata().contains_key(METADATA_DEFERRED_REASON));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_submits_and_runs_the_job(harness: Harness) {
    let job = start_running_job(&harness).await;

    assert_eq!(job.status(), FineTuningStatus::Running);
    let external = job.external_job_id().expect("provider reference recorded");
    assert!(external.starts_with("sim-"));
    let dataset = job.dataset_path().expect("dataset path recorded");
    assert!(dataset.as_str().starts_with(harness.output_dir.as_str()));
    assert!(
        std::fs::metadata(dataset).is_ok(),
        "dataset file should exist on disk"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn starting_a_submitted_job_again_is_rejected(harness: Harness) {
    let job = start_running_job(&harness).await;

    let result = harness
        .pipeline
        .start_pipeline(job.id(), &harness.output_dir)
        .await;

    assert!(matches!(
        result,
        Err(PipelineError::Domain(
            FineTuningDomainError::ExternalJobIdAlreadySet(id)
        )) if id == job.id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_retried_start_never_reaches_the_provider_again(harness: Harness) {
    seed_qualifying_session(&harness).await;
    let mut provider = MockProvider::new();
    provider
        .expect_submit()
        .times(1)
        .returning(|_, _, _| Ok("ext-once".to_owned()));
    let pipeline = FineTuningPipeline::new(
        Arc::clone(&harness.jobs),
        Arc::new(provider),
        Arc::new(SessionDatasetCurator::new(Arc::clone(&harness.sessions))),
        Arc::new(DefaultClock),
    );
    let job = pipeline
        .create_job("base-7b", "tuned-7b")
        .await
        .expect("job creation should succeed");
    let started = pipeline
        .start_pipeline(job.id(), &harness.output_dir)
        .await
        .expect("first start should succeed");
    assert_eq!(started.status(), FineTuningStatus::Running);

    let result = pipeline.start_pipeline(job.id(), &harness.output_dir).await;

    assert!(matches!(
        result,
        Err(PipelineError::Domain(
            FineTuningDomainError::ExternalJobIdAlreadySet(id)
        )) if id == job.id()
    ));
    let datasets = std::fs::read_dir(&harness.output_dir)
        .expect("output dir should be readable")
        .count();
    assert_eq!(datasets, 1, "the retry must not write a second dataset");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_rejects_a_job_already_past_pending(harness: Harness) {
    seed_qualifying_session(&harness).await;
    let timestamp = DefaultClock.utc();
    let job = FineTuningJob::from_persisted(PersistedJobData {
        id: JobId::new(),
        base_model: "base-7b".to_owned(),
        target_model_name: "tuned-7b".to_owned(),
        status: FineTuningStatus::Queued,
        dataset_path: None,
        external_job_id: None,
        metrics: None,
        metadata: BTreeMap::new(),
        created_at: timestamp,
        updated_at: timestamp,
    });
    harness
        .jobs
        .save(&job)
        .await
        .expect("job insert should succeed");

    let result = harness
        .pipeline
        .start_pipeline(job.id(), &harness.output_dir)
        .await;

    assert!(matches!(
        result,
        Err(PipelineError::Domain(
            FineTuningDomainError::InvalidFineTuningTransition {
                from: FineTuningStatus::Queued,
                to: FineTuningStatus::Running,
            }
        ))
    ));
    let datasets = std::fs::read_dir(&harness.output_dir)
        .expect("output dir should be readable")
        .count();
    assert_eq!(datasets, 0, "no dataset is written for a rejected start");
}

// ── Polling ────────────────────────────────────────────────────────

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn poll_records_progress_until_the_provider_finishes(harness: Harness) {
    let job = start_running_job(&harness).await;

    let updated = harness
        .pipeline
        .poll_jobs()
        .await
        .expect("poll should succeed");
    assert_eq!(updated, 1);

    let in_progress = harness
        .pipeline
        .find_job(job.id())
        .await
        .expect("lookup should succeed")
        .expect("job should exist");
    assert_eq!(in_progress.status(), FineTuningStatus::Running);
    assert_eq!(
        in_progress.metadata().get(METADATA_PROGRESS).map(String::as_str),
        Some("0.25")
    );

    for _ in 0..3 {
        harness
            .pipeline
            .poll_jobs()
            .await
            .expect("poll should succeed");
    }

    let finished = harness
        .pipeline
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
async fn poll_leaves_terminal_jobs_untouched(harness: Harness) {
    let job = start_running_job(&harness).await;
    for _ in 0..4 {
        harness
            .pipeline
            .poll_jobs()
            .await
            .expect("poll should succeed");
    }
    let finished = harness
        .pipeline
        .find_job(job.id())
        .await
        .expect("lookup should succeed")
        .expect("job should exist");
    assert_eq!(finished.status(), FineTuningStatus::Completed);

    let updated = harness
        .pipeline
        .poll_jobs()
        .await
        .expect("poll should succeed");

    assert_eq!(updated, 0);
    let after = harness
        .pipeline
        .find_job(job.id())
        .await
        .expect("lookup should succeed")
        .expect("job should exist");
    assert_eq!(after, finished);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn poll_skips_jobs_whose_provider_lookup_fails(harness: Harness) {
    let healthy = running_job("ext-healthy");
    let broken = running_job("ext-broken");
    harness
        .jobs
        .save(&healthy)
        .await
        .expect("job insert should succeed");
    harness
        .jobs
        .save(&broken)
        .await
        .expect("job insert should succeed");

    let mut provider = MockProvider::new();
    provider.expect_get_status().returning(|external_job_id| {
        if external_job_id == "ext-healthy" {
            Ok(TrainingStatusReport {
                progress: 1.0,
                state: TrainingState::Failed("gpu fault".to_owned()),
            })
        } else {
            Err(TrainingProviderError::UnknownExternalJob(
                external_job_id.to_owned(),
            ))
        }
    });
    let sessions = Arc::new(InMemorySessionRepository::new());
    let pipeline = FineTuningPipeline::new(
        Arc::clone(&harness.jobs),
        Arc::new(provider),
        Arc::new(SessionDatasetCurator::new(sessions)),
        Arc::new(DefaultClock),
    );

    let updated = pipeline.poll_jobs().await.expect("poll should succeed");

    assert_eq!(updated, 1);
    let failed = pipeline
        .find_job(healthy.id())
        .await
        .expect("lookup should succeed")
        .expect("job should exist");
    assert_eq!(failed.status(), FineTuningStatus::Failed);
    assert_eq!(
        failed.metadata().get(METADATA_FAILURE_REASON).map(String::as_str),
        Some("gpu fault")
    );
    let untouched = pipeline
        .find_job(broken.id())
        .await
        .expect("lookup should succeed")
        .expect("job should exist");
    assert_eq!(untouched, broken);
}

// ── Synchronous completion ─────────────────────────────────────────

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_job_progress_completes_a_running_job(harness: Harness) {
    let job = start_running_job(&harness).await;

    let completed = harness
        .pipeline
        .update_job_progress(job.id(), sample_metrics())
        .await
        .expect("completion should succeed");

    assert_eq!(completed.status(), FineTuningStatus::Completed);
    assert_eq!(completed.metrics(), Some(&sample_metrics()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_job_progress_rejects_a_pending_job(harness: Harness) {
    let job = create_job(&harness).await;

    let result = harness
        .pipeline
        .update_job_progress(job.id(), sample_metrics())
        .await;

    assert!(matches!(
        result,
        Err(PipelineError::Domain(
            FineTuningDomainError::InvalidFineTuningTransition {
                from: FineTuningStatus::Pending,
                to: FineTuningStatus::Completed,
            }
        ))
    ));
}
