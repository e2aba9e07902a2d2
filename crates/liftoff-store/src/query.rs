//! Read-side façade over the launch repository.
//!
//! This is what the public API consumes: list with optional status filter,
//! point lookup, and aggregate statistics. Sorting by `launch_date` is
//! lexicographic on the stored ISO-8601 string, which is safe because the
//! format is fixed-width and zero-padded.

use liftoff_core::error::{Error, Result};
use liftoff_core::launch::{LaunchRecord, LaunchStats, LaunchStatus};

use crate::repository::LaunchRepository;

/// Read-only query service over stored launch records.
#[derive(Debug, Clone)]
pub struct QueryService {
    repository: LaunchRepository,
}

impl QueryService {
    /// Creates a query service over the given repository.
    #[must_use]
    pub fn new(repository: LaunchRepository) -> Self {
        Self { repository }
    }

    /// Lists stored launches sorted by launch date descending.
    ///
    /// With a status filter the secondary-index path is used and `limit` is
    /// not applied (a status bucket is already bounded); without one the
    /// full table is scanned up to `limit` records.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` when the underlying read fails.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn list(
        &self,
        status: Option<LaunchStatus>,
        limit: Option<usize>,
    ) -> Result<Vec<LaunchRecord>> {
        let mut records = match status {
            Some(status) => self.repository.get_by_status(status).await?,
            None => self.repository.scan_all(limit).await?,
        };
        records.sort_by(|a, b| b.launch_date.cmp(&a.launch_date));
        Ok(records)
    }

    /// Fetches one launch by id.
    ///
    /// # Errors
    ///
    /// Returns `Error::ResourceNotFound` when no record exists for the id,
    /// `Error::Storage` when the read fails.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get(&self, launch_id: &str) -> Result<LaunchRecord> {
        self.repository
            .get_by_id(launch_id)
            .await?
            .ok_or_else(|| Error::resource_not_found("launch", launch_id))
    }

    /// Computes aggregate statistics over the whole table.
    ///
    /// The success rate denominator only counts completed launches
    /// (`success + failed`); `upcoming` and `unknown` do not dilute it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` when the scan fails.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn stats(&self) -> Result<LaunchStats> {
        let records = self.repository.scan_all(None).await?;

        let total = records.len();
        let success = records
            .iter()
            .filter(|r| r.status == LaunchStatus::Success)
            .count();
        let failed = records
            .iter()
            .filter(|r| r.status == LaunchStatus::Failed)
            .count();
        let upcoming = records
            .iter()
            .filter(|r| r.status == LaunchStatus::Upcoming)
            .count();

        Ok(LaunchStats {
            total,
            success,
            failed,
            upcoming,
            success_rate: success_rate(success, failed),
        })
    }
}

/// `success / (success + failed) * 100`, rounded to one decimal place;
/// `0.0` when no launch has completed.
#[allow(clippy::cast_precision_loss)]
fn success_rate(success: usize, failed: usize) -> f64 {
    let completed = success + failed;
    if completed == 0 {
        return 0.0;
    }
    let rate = success as f64 / completed as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}
