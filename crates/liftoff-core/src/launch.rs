//! The normalized launch domain model.
//!
//! A [`LaunchRecord`] is the unit stored in the table: one row per external
//! launch id, fully replaced on every sync. The `status` field is derived
//! during mapping and is the partition key of the table's secondary index.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Derived launch status.
///
/// Always computed from the raw `upcoming`/`success` flags, never accepted
/// from external input. `upcoming` takes precedence over `success`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchStatus {
    /// The launch completed successfully.
    Success,
    /// The launch completed and failed.
    Failed,
    /// The launch has not happened yet.
    Upcoming,
    /// The launch completed but its outcome is not known.
    Unknown,
}

impl LaunchStatus {
    /// Returns the wire/storage representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Upcoming => "upcoming",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for LaunchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LaunchStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            "upcoming" => Ok(Self::Upcoming),
            "unknown" => Ok(Self::Unknown),
            other => Err(Error::InvalidInput(format!(
                "status must be one of success, failed, upcoming, unknown (got {other})"
            ))),
        }
    }
}

/// A normalized launch record as stored in the table.
///
/// Field normalization rules: optional text and URL fields are stored as
/// empty strings when the source omits them, `payloads` as an empty list,
/// and `flight_number` as the decimal string form of the source integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRecord {
    /// Stable externally-assigned launch identifier (primary key).
    pub launch_id: String,
    /// Mission name.
    pub mission_name: String,
    /// Rocket name (or source-side rocket id when unresolved).
    pub rocket_name: String,
    /// Launch date as an ISO-8601 UTC string; sortable lexicographically.
    pub launch_date: String,
    /// Derived launch status (secondary index key).
    pub status: LaunchStatus,
    /// Launchpad name (or source-side launchpad id when unresolved).
    pub launchpad: String,
    /// Flight number, stored as a string.
    pub flight_number: String,
    /// Free-text launch details.
    pub details: String,
    /// Ordered payload identifiers.
    pub payloads: Vec<String>,
    /// Webcast URL.
    pub webcast_url: String,
    /// Article URL.
    pub article_url: String,
    /// Wikipedia URL.
    pub wikipedia_url: String,
    /// Small mission patch image URL.
    pub patch_small: String,
    /// Large mission patch image URL.
    pub patch_large: String,
}

/// Aggregate launch statistics over the whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchStats {
    /// Total stored launches.
    pub total: usize,
    /// Launches with status `success`.
    pub success: usize,
    /// Launches with status `failed`.
    pub failed: usize,
    /// Launches with status `upcoming`.
    pub upcoming: usize,
    /// `success / (success + failed) * 100`, rounded to one decimal;
    /// `0.0` when no completed launches exist.
    pub success_rate: f64,
}

/// Bounded preview entry of a processed launch, for sync observability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchPreview {
    /// Launch identifier.
    pub launch_id: String,
    /// Mission name.
    pub mission_name: String,
    /// Launch date string.
    pub launch_date: String,
    /// Derived status.
    pub status: LaunchStatus,
}

/// Outcome summary of one sync run. Ephemeral; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    /// Records obtained from the source API.
    pub total_fetched: usize,
    /// Records written for the first time.
    pub inserted: usize,
    /// Records that replaced an existing row.
    pub updated: usize,
    /// Records whose individual upsert failed.
    pub errors: usize,
    /// The first 10 processed records, in fetch order.
    pub launches: Vec<LaunchPreview>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&LaunchStatus::Upcoming).unwrap();
        assert_eq!(json, "\"upcoming\"");
    }

    #[test]
    fn status_parses_all_values() {
        for (text, status) in [
            ("success", LaunchStatus::Success),
            ("failed", LaunchStatus::Failed),
            ("upcoming", LaunchStatus::Upcoming),
            ("unknown", LaunchStatus::Unknown),
        ] {
            assert_eq!(text.parse::<LaunchStatus>().unwrap(), status);
            assert_eq!(status.as_str(), text);
        }
    }

    #[test]
    fn status_rejects_unrecognized_value() {
        let err = "landed".parse::<LaunchStatus>().unwrap_err();
        assert!(err.to_string().contains("landed"));
    }
}
