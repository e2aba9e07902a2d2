//! Launch table access: scans, lookups, and keyed upserts.

use std::sync::Arc;

use liftoff_core::error::Result;
use liftoff_core::launch::{LaunchRecord, LaunchStatus};
use liftoff_core::table::LaunchTable;

/// Whether an upsert created a new row or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record existed for the id before the write.
    Inserted,
    /// An existing record was fully replaced.
    Updated,
}

/// Repository owning all storage access for launch records.
#[derive(Clone)]
pub struct LaunchRepository {
    table: Arc<dyn LaunchTable>,
}

impl std::fmt::Debug for LaunchRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchRepository")
            .field("table", &"<LaunchTable>")
            .finish()
    }
}

impl LaunchRepository {
    /// Creates a repository over the given table backend.
    #[must_use]
    pub fn new(table: Arc<dyn LaunchTable>) -> Self {
        Self { table }
    }

    /// Point lookup by launch id.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` when the backend read fails.
    pub async fn get_by_id(&self, launch_id: &str) -> Result<Option<LaunchRecord>> {
        self.table.get(launch_id).await
    }

    /// Looks up all records in a status bucket via the secondary index.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` when the backend query fails.
    pub async fn get_by_status(&self, status: LaunchStatus) -> Result<Vec<LaunchRecord>> {
        self.table.query_status(status).await
    }

    /// Scans the whole table, following continuation tokens across backend
    /// page boundaries until the scan is exhausted or `limit` records have
    /// been accumulated. Correct for zero, one, or many pages.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` when any page fetch fails.
    pub async fn scan_all(&self, limit: Option<usize>) -> Result<Vec<LaunchRecord>> {
        let mut records: Vec<LaunchRecord> = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let remaining = limit.map(|l| l.saturating_sub(records.len()));
            let page = self.table.scan_page(token.as_deref(), remaining).await?;
            records.extend(page.records);

            if let Some(limit) = limit {
                if records.len() >= limit {
                    records.truncate(limit);
                    break;
                }
            }

            match page.next {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        Ok(records)
    }

    /// Inserts or fully replaces the record keyed by its `launch_id`.
    ///
    /// The insert/update classification comes from a point read issued
    /// before the unconditional write; the pair is not transactional. A
    /// concurrent writer for the same id between the check and the write can
    /// make the reported [`UpsertOutcome`] wrong, while the stored data
    /// remains correct (last write wins). Accepted consistency caveat.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` when the pre-check read or the write fails.
    pub async fn upsert(&self, record: LaunchRecord) -> Result<UpsertOutcome> {
        let launch_id = record.launch_id.clone();
        let existing = self.table.get(&launch_id).await?;
        self.table.put(record).await?;

        let outcome = if existing.is_some() {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Inserted
        };
        tracing::debug!(launch_id = %launch_id, outcome = ?outcome, "upserted launch");
        Ok(outcome)
    }

    /// Shallow backend reachability probe.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` when the backend is unreachable.
    pub async fn ping(&self) -> Result<()> {
        self.table.ping().await
    }
}
