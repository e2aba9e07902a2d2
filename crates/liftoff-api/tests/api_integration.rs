//! API integration tests.
//!
//! Tests the complete request flow: HTTP → routes → store → table backend,
//! with an in-memory table and a stub launch source.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use tower::ServiceExt;

use liftoff_api::config::Config;
use liftoff_api::server::Server;
use liftoff_core::error::Error;
use liftoff_core::launch::{LaunchRecord, LaunchStatus};
use liftoff_core::table::{LaunchTable, MemoryTable};
use liftoff_sync::source::{LaunchSource, RawLaunch};

/// Launch source stub: serves canned records, or fails every fetch.
struct StubSource {
    past: Vec<RawLaunch>,
    upcoming: Vec<RawLaunch>,
    fail: bool,
}

impl StubSource {
    fn serving(past: Vec<RawLaunch>, upcoming: Vec<RawLaunch>) -> Self {
        Self {
            past,
            upcoming,
            fail: false,
        }
    }

    fn unavailable() -> Self {
        Self {
            past: vec![],
            upcoming: vec![],
            fail: true,
        }
    }

    fn check(&self) -> liftoff_core::Result<()> {
        if self.fail {
            return Err(Error::source_unavailable(
                "https://stub.test/launches/past",
                "connection failed",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl LaunchSource for StubSource {
    async fn fetch_past(&self) -> liftoff_core::Result<Vec<RawLaunch>> {
        self.check()?;
        Ok(self.past.clone())
    }

    async fn fetch_upcoming(&self) -> liftoff_core::Result<Vec<RawLaunch>> {
        self.check()?;
        Ok(self.upcoming.clone())
    }

    async fn fetch_all(&self) -> liftoff_core::Result<Vec<RawLaunch>> {
        self.check()?;
        let mut all = self.past.clone();
        all.extend(self.upcoming.clone());
        Ok(all)
    }

    async fn fetch_launch(&self, launch_id: &str) -> liftoff_core::Result<RawLaunch> {
        self.check()?;
        self.fetch_all()
            .await?
            .into_iter()
            .find(|l| l.id == launch_id)
            .ok_or_else(|| Error::resource_not_found("launch", launch_id))
    }
}

fn debug_config() -> Config {
    Config {
        debug: true,
        ..Config::default()
    }
}

fn test_router_with(table: Arc<dyn LaunchTable>, source: StubSource) -> Result<axum::Router> {
    Ok(Server::new(debug_config())?
        .with_table(table)
        .with_source(Arc::new(source))
        .test_router())
}

fn test_router(table: Arc<dyn LaunchTable>) -> Result<axum::Router> {
    test_router_with(table, StubSource::serving(vec![], vec![]))
}

fn record(id: &str, date: &str, status: LaunchStatus) -> LaunchRecord {
    LaunchRecord {
        launch_id: id.to_string(),
        mission_name: format!("Mission {id}"),
        rocket_name: "Falcon 9".to_string(),
        launch_date: date.to_string(),
        status,
        launchpad: "SLC-40".to_string(),
        flight_number: "12".to_string(),
        details: String::new(),
        payloads: vec![],
        webcast_url: String::new(),
        article_url: String::new(),
        wikipedia_url: String::new(),
        patch_small: String::new(),
        patch_large: String::new(),
    }
}

fn raw(id: &str, upcoming: bool) -> RawLaunch {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": format!("Mission {id}"),
        "date_utc": "2022-03-01T00:00:00.000Z",
        "flight_number": 3,
        "upcoming": upcoming,
        "success": if upcoming { serde_json::Value::Null } else { serde_json::Value::Bool(true) },
    }))
    .expect("raw launch fixture should deserialize")
}

mod helpers {
    use super::*;

    fn make_request(method: Method, uri: &str) -> Result<Request<Body>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::empty())
            .context("build request")
    }

    async fn send_json(
        router: axum::Router,
        method: Method,
        uri: &str,
    ) -> Result<(StatusCode, serde_json::Value)> {
        let request = make_request(method, uri)?;
        let response = match router.oneshot(request).await {
            Ok(response) => response,
            Err(err) => match err {},
        };
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .context("read response body")?;
        let json = serde_json::from_slice(&body).with_context(|| {
            format!(
                "parse JSON response (status={status}): {}",
                String::from_utf8_lossy(&body)
            )
        })?;
        Ok((status, json))
    }

    pub async fn get_json(
        router: axum::Router,
        uri: &str,
    ) -> Result<(StatusCode, serde_json::Value)> {
        send_json(router, Method::GET, uri).await
    }

    pub async fn post_json(
        router: axum::Router,
        uri: &str,
    ) -> Result<(StatusCode, serde_json::Value)> {
        send_json(router, Method::POST, uri).await
    }
}

/// Table whose reachability probe always fails.
struct UnreachableTable {
    inner: MemoryTable,
}

#[async_trait]
impl LaunchTable for UnreachableTable {
    async fn get(&self, launch_id: &str) -> liftoff_core::Result<Option<LaunchRecord>> {
        self.inner.get(launch_id).await
    }

    async fn put(&self, record: LaunchRecord) -> liftoff_core::Result<()> {
        self.inner.put(record).await
    }

    async fn query_status(
        &self,
        status: LaunchStatus,
    ) -> liftoff_core::Result<Vec<LaunchRecord>> {
        self.inner.query_status(status).await
    }

    async fn scan_page(
        &self,
        start: Option<&str>,
        limit: Option<usize>,
    ) -> liftoff_core::Result<liftoff_core::table::ScanPage> {
        self.inner.scan_page(start, limit).await
    }

    async fn ping(&self) -> liftoff_core::Result<()> {
        Err(Error::storage("connection refused"))
    }
}

#[tokio::test]
async fn health_reports_storage_reachable() -> Result<()> {
    let router = test_router(Arc::new(MemoryTable::new()))?;

    let (status, body) = helpers::get_json(router, "/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "ok");
    assert!(body["version"].is_string());
    Ok(())
}

#[tokio::test]
async fn health_degrades_when_storage_is_unreachable() -> Result<()> {
    let table = Arc::new(UnreachableTable {
        inner: MemoryTable::new(),
    });
    let router = test_router(table)?;

    let (status, body) = helpers::get_json(router, "/health").await?;
    assert_eq!(status, StatusCode::OK, "health stays 200 while degraded");
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["storage"], "error");
    Ok(())
}

#[tokio::test]
async fn root_describes_the_service() -> Result<()> {
    let router = test_router(Arc::new(MemoryTable::new()))?;

    let (status, body) = helpers::get_json(router, "/").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "liftoff-api");
    assert_eq!(body["docs"], "/openapi.json");
    Ok(())
}

#[tokio::test]
async fn openapi_spec_is_served() -> Result<()> {
    let router = test_router(Arc::new(MemoryTable::new()))?;

    let (status, body) = helpers::get_json(router, "/openapi.json").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/launches"].is_object());
    assert!(body["paths"]["/api/v1/trigger"].is_object());
    Ok(())
}

#[tokio::test]
async fn list_on_empty_table_returns_empty_array() -> Result<()> {
    let router = test_router(Arc::new(MemoryTable::new()))?;

    let (status, body) = helpers::get_json(router, "/api/v1/launches").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
    Ok(())
}

#[tokio::test]
async fn list_returns_launches_newest_first() -> Result<()> {
    let table = Arc::new(MemoryTable::new());
    table
        .put(record("a", "2019-01-01T00:00:00.000Z", LaunchStatus::Success))
        .await?;
    table
        .put(record("b", "2021-01-01T00:00:00.000Z", LaunchStatus::Failed))
        .await?;
    table
        .put(record("c", "2020-01-01T00:00:00.000Z", LaunchStatus::Success))
        .await?;

    let router = test_router(table)?;
    let (status, body) = helpers::get_json(router, "/api/v1/launches").await?;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<_> = body
        .as_array()
        .context("expected array body")?
        .iter()
        .map(|l| l["launch_id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
    Ok(())
}

#[tokio::test]
async fn list_filters_by_status() -> Result<()> {
    let table = Arc::new(MemoryTable::new());
    table
        .put(record("a", "2019-01-01T00:00:00.000Z", LaunchStatus::Success))
        .await?;
    table
        .put(record("b", "2030-01-01T00:00:00.000Z", LaunchStatus::Upcoming))
        .await?;

    let router = test_router(table)?;
    let (status, body) = helpers::get_json(router, "/api/v1/launches?status=upcoming").await?;
    assert_eq!(status, StatusCode::OK);

    let launches = body.as_array().context("expected array body")?;
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0]["launch_id"], "b");
    assert_eq!(launches[0]["status"], "upcoming");
    Ok(())
}

#[tokio::test]
async fn list_applies_limit_to_unfiltered_scan() -> Result<()> {
    let table = Arc::new(MemoryTable::new());
    for (id, date) in [
        ("a", "2019-01-01T00:00:00.000Z"),
        ("b", "2020-01-01T00:00:00.000Z"),
        ("c", "2021-01-01T00:00:00.000Z"),
    ] {
        table.put(record(id, date, LaunchStatus::Success)).await?;
    }

    let router = test_router(table)?;
    let (status, body) = helpers::get_json(router, "/api/v1/launches?limit=2").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().context("expected array body")?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn list_rejects_unknown_status_value() -> Result<()> {
    let router = test_router(Arc::new(MemoryTable::new()))?;

    let (status, body) = helpers::get_json(router, "/api/v1/launches?status=exploded").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["message"].as_str().unwrap().contains("exploded"));
    Ok(())
}

#[tokio::test]
async fn list_rejects_out_of_range_limits() -> Result<()> {
    for uri in ["/api/v1/launches?limit=0", "/api/v1/launches?limit=501"] {
        let router = test_router(Arc::new(MemoryTable::new()))?;
        let (status, body) = helpers::get_json(router, uri).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
        assert_eq!(body["code"], "BAD_REQUEST");
    }
    Ok(())
}

#[tokio::test]
async fn get_launch_returns_the_full_record() -> Result<()> {
    let table = Arc::new(MemoryTable::new());
    let mut stored = record("a1", "2020-12-06T16:17:00.000Z", LaunchStatus::Success);
    stored.payloads = vec!["p1".to_string()];
    stored.webcast_url = "https://youtu.be/x".to_string();
    table.put(stored).await?;

    let router = test_router(table)?;
    let (status, body) = helpers::get_json(router, "/api/v1/launches/a1").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["launch_id"], "a1");
    assert_eq!(body["status"], "success");
    assert_eq!(body["payloads"], serde_json::json!(["p1"]));
    assert_eq!(body["webcast_url"], "https://youtu.be/x");
    Ok(())
}

#[tokio::test]
async fn get_missing_launch_is_404_with_envelope() -> Result<()> {
    let router = test_router(Arc::new(MemoryTable::new()))?;

    let (status, body) = helpers::get_json(router, "/api/v1/launches/ghost").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["message"].as_str().unwrap().contains("ghost"));
    Ok(())
}

#[tokio::test]
async fn stats_counts_buckets_and_success_rate() -> Result<()> {
    let table = Arc::new(MemoryTable::new());
    for i in 0..8 {
        table
            .put(record(
                &format!("s{i}"),
                "2020-01-01T00:00:00.000Z",
                LaunchStatus::Success,
            ))
            .await?;
    }
    table
        .put(record("f0", "2020-01-01T00:00:00.000Z", LaunchStatus::Failed))
        .await?;
    table
        .put(record(
            "u0",
            "2030-01-01T00:00:00.000Z",
            LaunchStatus::Upcoming,
        ))
        .await?;

    let router = test_router(table)?;
    let (status, body) = helpers::get_json(router, "/api/v1/launches/stats").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 10);
    assert_eq!(body["success"], 8);
    assert_eq!(body["failed"], 1);
    assert_eq!(body["upcoming"], 1);
    assert_eq!(body["success_rate"], 88.9);
    Ok(())
}

#[tokio::test]
async fn trigger_syncs_records_into_the_table() -> Result<()> {
    let table = Arc::new(MemoryTable::new());
    let source = StubSource::serving(vec![raw("p1", false), raw("p2", false)], vec![raw("u1", true)]);

    let router = test_router_with(table.clone(), source)?;
    let (status, body) = helpers::post_json(router, "/api/v1/trigger").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_fetched"], 3);
    assert_eq!(body["inserted"], 3);
    assert_eq!(body["updated"], 0);
    assert_eq!(body["errors"], 0);

    let preview = body["launches"].as_array().context("expected preview")?;
    assert_eq!(preview.len(), 3);
    assert_eq!(preview[0]["launch_id"], "p1");
    assert_eq!(preview[2]["status"], "upcoming");

    assert!(table.get("u1").await?.is_some());
    Ok(())
}

#[tokio::test]
async fn second_trigger_reports_updates() -> Result<()> {
    let table = Arc::new(MemoryTable::new());

    let router = test_router_with(
        table.clone(),
        StubSource::serving(vec![raw("p1", false)], vec![]),
    )?;
    let (status, _) = helpers::post_json(router, "/api/v1/trigger").await?;
    assert_eq!(status, StatusCode::OK);

    let router = test_router_with(
        table,
        StubSource::serving(vec![raw("p1", false)], vec![]),
    )?;
    let (status, body) = helpers::post_json(router, "/api/v1/trigger").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inserted"], 0);
    assert_eq!(body["updated"], 1);
    Ok(())
}

#[tokio::test]
async fn trigger_maps_source_failure_to_bad_gateway() -> Result<()> {
    let table = Arc::new(MemoryTable::new());
    let router = test_router_with(table.clone(), StubSource::unavailable())?;

    let (status, body) = helpers::post_json(router, "/api/v1/trigger").await?;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "BAD_GATEWAY");
    assert!(body["message"].as_str().unwrap().contains("stub.test"));

    let page = table.scan_page(None, None).await?;
    assert!(page.records.is_empty(), "failed sync must not write records");
    Ok(())
}
