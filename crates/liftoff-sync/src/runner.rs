//! Sync orchestration: fetch, map, upsert, summarize.

use std::sync::Arc;

use liftoff_core::error::{Error, Result};
use liftoff_core::launch::{LaunchPreview, SyncSummary};
use liftoff_store::repository::{LaunchRepository, UpsertOutcome};

use crate::mapper::map_launch;
use crate::source::LaunchSource;

/// How many processed records the summary previews.
const PREVIEW_LIMIT: usize = 10;

/// Runs one full sync of the launch table from the source API.
#[derive(Clone)]
pub struct SyncRunner {
    source: Arc<dyn LaunchSource>,
    repository: LaunchRepository,
}

impl std::fmt::Debug for SyncRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncRunner")
            .field("source", &"<LaunchSource>")
            .field("repository", &self.repository)
            .finish()
    }
}

impl SyncRunner {
    /// Creates a runner over the given source and repository.
    #[must_use]
    pub fn new(source: Arc<dyn LaunchSource>, repository: LaunchRepository) -> Self {
        Self { source, repository }
    }

    /// Fetches past then upcoming launches, maps each, and upserts each
    /// individually.
    ///
    /// A fetch failure aborts the run and propagates `Error::Source`; no
    /// summary is produced, since nothing was obtained. A per-record upsert
    /// failure only increments the `errors` counter; the batch continues.
    /// The summary previews the first 10 processed records in fetch order,
    /// whether or not their individual upsert succeeded.
    ///
    /// # Errors
    ///
    /// Returns `Error::Source` when either collection fetch fails.
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn run(&self) -> Result<SyncSummary> {
        let past = self.source.fetch_past().await?;
        let upcoming = self.source.fetch_upcoming().await?;

        let mut raw = past;
        raw.extend(upcoming);
        tracing::info!(fetched = raw.len(), "fetched launch records");

        let mut inserted = 0;
        let mut updated = 0;
        let mut errors = 0;
        let mut launches = Vec::with_capacity(PREVIEW_LIMIT.min(raw.len()));

        for raw_launch in &raw {
            let record = map_launch(raw_launch);

            if launches.len() < PREVIEW_LIMIT {
                launches.push(LaunchPreview {
                    launch_id: record.launch_id.clone(),
                    mission_name: record.mission_name.clone(),
                    launch_date: record.launch_date.clone(),
                    status: record.status,
                });
            }

            match self.repository.upsert(record).await {
                Ok(UpsertOutcome::Inserted) => inserted += 1,
                Ok(UpsertOutcome::Updated) => updated += 1,
                Err(err @ Error::Storage { .. }) => {
                    tracing::error!(launch_id = %raw_launch.id, error = %err, "storage error during upsert");
                    errors += 1;
                }
                Err(err) => {
                    tracing::error!(launch_id = %raw_launch.id, error = %err, "unexpected upsert failure");
                    errors += 1;
                }
            }
        }

        let summary = SyncSummary {
            total_fetched: raw.len(),
            inserted,
            updated,
            errors,
            launches,
        };
        tracing::info!(
            fetched = summary.total_fetched,
            inserted = summary.inserted,
            updated = summary.updated,
            errors = summary.errors,
            "sync completed"
        );
        Ok(summary)
    }
}
