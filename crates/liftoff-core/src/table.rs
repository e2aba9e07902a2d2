//! Table backend abstraction for launch storage.
//!
//! This module defines the storage contract all backends implement: point
//! reads and unconditional writes keyed by `launch_id`, a status-index
//! lookup, and a paginated full scan.
//!
//! ## Continuation tokens
//!
//! `scan_page` returns at most one backend page per call together with an
//! opaque continuation token when more pages remain. The token is the last
//! returned `launch_id`: DynamoDB's `LastEvaluatedKey` for a table whose
//! primary key is `launch_id` reduces to exactly that, and the in-memory
//! backend mirrors the semantics. Callers that want the whole table loop
//! until no token comes back.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::launch::{LaunchRecord, LaunchStatus};

/// One page of a table scan.
#[derive(Debug, Clone)]
pub struct ScanPage {
    /// Records in this page, in storage-natural order.
    pub records: Vec<LaunchRecord>,
    /// Continuation token; `None` when the scan is exhausted.
    pub next: Option<String>,
}

/// Storage contract for the launch table.
///
/// All backends (DynamoDB, memory) implement this trait. Single-key reads
/// and writes are atomic per the backend's own guarantees; nothing beyond
/// that is assumed.
#[async_trait]
pub trait LaunchTable: Send + Sync + 'static {
    /// Point lookup by primary key.
    ///
    /// Returns `Ok(None)` when no record exists for the id.
    async fn get(&self, launch_id: &str) -> Result<Option<LaunchRecord>>;

    /// Unconditional put. An existing record with the same `launch_id` is
    /// fully replaced.
    async fn put(&self, record: LaunchRecord) -> Result<()>;

    /// Looks up records through the status secondary index.
    ///
    /// Ordering within a status bucket is storage-natural and unspecified.
    async fn query_status(&self, status: LaunchStatus) -> Result<Vec<LaunchRecord>>;

    /// Fetches one scan page, resuming after `start` when given.
    ///
    /// `limit` is a per-page size hint; backends may return fewer records
    /// than the hint but never more.
    async fn scan_page(&self, start: Option<&str>, limit: Option<usize>) -> Result<ScanPage>;

    /// Shallow reachability probe used by health reporting.
    async fn ping(&self) -> Result<()>;
}

const DEFAULT_PAGE_SIZE: usize = 100;

/// In-memory table backend for tests and local development.
///
/// Thread-safe via `RwLock`. Not suitable for production. The page size is
/// configurable so tests can exercise multi-page scans with small data sets.
#[derive(Debug)]
pub struct MemoryTable {
    records: RwLock<BTreeMap<String, LaunchRecord>>,
    page_size: usize,
}

impl Default for MemoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTable {
    /// Creates a new empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Creates a new empty table with the given scan page size.
    #[must_use]
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            page_size: page_size.max(1),
        }
    }
}

#[async_trait]
impl LaunchTable for MemoryTable {
    async fn get(&self, launch_id: &str) -> Result<Option<LaunchRecord>> {
        let records = self.records.read().map_err(|_| Error::Internal {
            message: "lock poisoned".into(),
        })?;
        Ok(records.get(launch_id).cloned())
    }

    async fn put(&self, record: LaunchRecord) -> Result<()> {
        let mut records = self.records.write().map_err(|_| Error::Internal {
            message: "lock poisoned".into(),
        })?;
        records.insert(record.launch_id.clone(), record);
        Ok(())
    }

    async fn query_status(&self, status: LaunchStatus) -> Result<Vec<LaunchRecord>> {
        let records = self.records.read().map_err(|_| Error::Internal {
            message: "lock poisoned".into(),
        })?;
        Ok(records
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect())
    }

    async fn scan_page(&self, start: Option<&str>, limit: Option<usize>) -> Result<ScanPage> {
        let records = self.records.read().map_err(|_| Error::Internal {
            message: "lock poisoned".into(),
        })?;

        let lower = match start {
            Some(token) => Bound::Excluded(token.to_string()),
            None => Bound::Unbounded,
        };

        let page_size = limit.map_or(self.page_size, |l| l.min(self.page_size));
        let mut page: Vec<LaunchRecord> = records
            .range((lower, Bound::Unbounded))
            .take(page_size + 1)
            .map(|(_, r)| r.clone())
            .collect();

        let next = if page.len() > page_size {
            page.truncate(page_size);
            page.last().map(|r| r.launch_id.clone())
        } else {
            None
        };

        Ok(ScanPage {
            records: page,
            next,
        })
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, status: LaunchStatus) -> LaunchRecord {
        LaunchRecord {
            launch_id: id.to_string(),
            mission_name: format!("Mission {id}"),
            rocket_name: "Falcon 9".to_string(),
            launch_date: "2020-01-01T00:00:00.000Z".to_string(),
            status,
            launchpad: "LC-39A".to_string(),
            flight_number: "1".to_string(),
            details: String::new(),
            payloads: vec![],
            webcast_url: String::new(),
            article_url: String::new(),
            wikipedia_url: String::new(),
            patch_small: String::new(),
            patch_large: String::new(),
        }
    }

    #[tokio::test]
    async fn put_then_get_roundtrip() {
        let table = MemoryTable::new();
        let original = record("a1", LaunchStatus::Success);

        table.put(original.clone()).await.unwrap();
        let fetched = table.get("a1").await.unwrap().expect("record should exist");
        assert_eq!(fetched, original);
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let table = MemoryTable::new();
        assert!(table.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_replaces_all_fields() {
        let table = MemoryTable::new();
        let mut first = record("a1", LaunchStatus::Failed);
        first.details = "engine failure".to_string();
        first.payloads = vec!["p1".to_string()];
        table.put(first).await.unwrap();

        // Second version drops details and payloads entirely.
        let second = record("a1", LaunchStatus::Success);
        table.put(second.clone()).await.unwrap();

        let fetched = table.get("a1").await.unwrap().unwrap();
        assert_eq!(fetched, second);
        assert!(fetched.details.is_empty());
        assert!(fetched.payloads.is_empty());
    }

    #[tokio::test]
    async fn query_status_filters_bucket() {
        let table = MemoryTable::new();
        table.put(record("a", LaunchStatus::Success)).await.unwrap();
        table.put(record("b", LaunchStatus::Failed)).await.unwrap();
        table.put(record("c", LaunchStatus::Success)).await.unwrap();

        let successes = table.query_status(LaunchStatus::Success).await.unwrap();
        assert_eq!(successes.len(), 2);
        assert!(successes.iter().all(|r| r.status == LaunchStatus::Success));
    }

    #[tokio::test]
    async fn scan_empty_table_is_a_single_exhausted_page() {
        let table = MemoryTable::with_page_size(2);
        let page = table.scan_page(None, None).await.unwrap();
        assert!(page.records.is_empty());
        assert!(page.next.is_none());
    }

    #[tokio::test]
    async fn scan_pages_cover_the_table_without_overlap() {
        let table = MemoryTable::with_page_size(2);
        for id in ["a", "b", "c", "d", "e"] {
            table.put(record(id, LaunchStatus::Success)).await.unwrap();
        }

        let mut seen = Vec::new();
        let mut token: Option<String> = None;
        let mut pages = 0;
        loop {
            let page = table.scan_page(token.as_deref(), None).await.unwrap();
            pages += 1;
            seen.extend(page.records.into_iter().map(|r| r.launch_id));
            match page.next {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        assert_eq!(pages, 3);
        assert_eq!(seen, vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn scan_page_honors_limit_hint_below_page_size() {
        let table = MemoryTable::with_page_size(10);
        for id in ["a", "b", "c"] {
            table.put(record(id, LaunchStatus::Success)).await.unwrap();
        }

        let page = table.scan_page(None, Some(2)).await.unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.next.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn final_exact_page_reports_exhaustion() {
        let table = MemoryTable::with_page_size(2);
        for id in ["a", "b", "c", "d"] {
            table.put(record(id, LaunchStatus::Success)).await.unwrap();
        }

        let first = table.scan_page(None, None).await.unwrap();
        assert_eq!(first.records.len(), 2);
        let second = table
            .scan_page(first.next.as_deref(), None)
            .await
            .unwrap();
        assert_eq!(second.records.len(), 2);
        assert!(second.next.is_none(), "exact final page must end the scan");
    }
}
