//! Curates completed sessions into JSONL training datasets.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::fine_tuning::ports::{CurationResult, DatasetCurator};
use crate::session::{domain::SessionEntity, ports::SessionRepository};

/// Success-rate threshold applied when callers do not choose one.
pub const DEFAULT_MIN_SUCCESS_RATE: f64 = 0.9;

/// One instruction/output pair in the emitted dataset.
#[derive(Serialize)]
struct DatasetRecord<'a> {
    instruction: &'a str,
    output: &'a str,
}

/// Dataset curator backed by the session store.
#[derive(Clone)]
pub struct SessionDatasetCurator<S>
where
    S: SessionRepository,
{
    sessions: Arc<S>,
}

impl<S> SessionDatasetCurator<S>
where
    S: SessionRepository,
{
    /// Creates a curator reading from the given session store.
    #[must_use]
    pub const fn new(sessions: Arc<S>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl<S> DatasetCurator for SessionDatasetCurator<S>
where
    S: SessionRepository,
{
    async fn curate(
        &self,
        output_dir: &Utf8Path,
        min_success_rate: f64,
    ) -> CurationResult<Option<Utf8PathBuf>> {
        let completed = self.sessions.list_completed().await?;

        let mut lines = Vec::new();
        for session in &completed {
            if let Some(line) = render_record(session, min_success_rate)? {
                lines.push(line);
            }
        }
        if lines.is_empty() {
            return Ok(None);
        }

        let file_name = format!("dataset-{}.jsonl", Uuid::new_v4().simple());
        let mut contents = lines.join("\n");
        contents.push('\n');

        let dir = Dir::open_ambient_dir(output_dir, ambient_authority())?;
        dir.write(&file_name, contents)?;
        Ok(Some(output_dir.join(file_name)))
    }
}

/// Serializes one session into a dataset line, or `None` when the
/// session does not qualify.
fn render_record(
    session: &SessionEntity,
    min_success_rate: f64,
) -> Result<Option<String>, serde_json::Error> {
    let metrics = session.metrics();
    if metrics.success_rate < min_success_rate {
        return Ok(None);
    }
    let Some(result) = metrics.result.as_ref() else {
        return Ok(None);
    };
    let instruction = session.initial_prompt().trim();
    if instruction.is_empty() {
        return Ok(None);
    }
    let output = match result {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    if output.trim().is_empty() {
        return Ok(None);
    }
    let line = serde_json::to_string(&DatasetRecord {
        instruction,
        output: &output,
    })?;
    Ok(Some(line))
}
