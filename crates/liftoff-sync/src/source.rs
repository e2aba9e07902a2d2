//! HTTP client for the external launch data API (SpaceX v4 schema).
//!
//! [`LaunchSource`] is the seam the orchestrator depends on; tests swap in a
//! stub, production uses [`SpaceXClient`]. All client failures (timeout,
//! connection, non-2xx status, unparseable body) surface as
//! `Error::Source` carrying the offending URL. No retries here; callers see
//! the first failure.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use liftoff_core::error::{Error, Result};

/// Default base URL of the public launch data API.
pub const SPACEX_BASE_URL: &str = "https://api.spacexdata.com/v4";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Raw launch record as returned by the source API.
///
/// Every field except the id may be absent or null; normalization happens
/// in the mapper, not here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawLaunch {
    /// Stable launch identifier.
    pub id: String,
    /// Mission name.
    #[serde(default)]
    pub name: Option<String>,
    /// Launch date, ISO-8601 UTC.
    #[serde(default)]
    pub date_utc: Option<String>,
    /// Rocket id or name.
    #[serde(default)]
    pub rocket: Option<String>,
    /// Launchpad id or name.
    #[serde(default)]
    pub launchpad: Option<String>,
    /// Flight number (integer on the wire).
    #[serde(default)]
    pub flight_number: Option<i64>,
    /// Free-text details.
    #[serde(default)]
    pub details: Option<String>,
    /// Whether the launch has not happened yet.
    #[serde(default)]
    pub upcoming: Option<bool>,
    /// Whether the launch succeeded; null until the outcome is known.
    #[serde(default)]
    pub success: Option<bool>,
    /// Payload identifiers, in order.
    #[serde(default)]
    pub payloads: Option<Vec<String>>,
    /// Related links.
    #[serde(default)]
    pub links: Option<RawLinks>,
}

/// Link block of a raw launch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawLinks {
    /// Webcast URL.
    #[serde(default)]
    pub webcast: Option<String>,
    /// Article URL.
    #[serde(default)]
    pub article: Option<String>,
    /// Wikipedia URL.
    #[serde(default)]
    pub wikipedia: Option<String>,
    /// Mission patch images.
    #[serde(default)]
    pub patch: Option<RawPatch>,
}

/// Mission patch image URLs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawPatch {
    /// Small patch image URL.
    #[serde(default)]
    pub small: Option<String>,
    /// Large patch image URL.
    #[serde(default)]
    pub large: Option<String>,
}

/// Source of raw launch records.
///
/// Object-safe so the sync runner can be driven by a stub in tests.
#[async_trait]
pub trait LaunchSource: Send + Sync + 'static {
    /// Fetches all past launches.
    async fn fetch_past(&self) -> Result<Vec<RawLaunch>>;

    /// Fetches all upcoming launches.
    async fn fetch_upcoming(&self) -> Result<Vec<RawLaunch>>;

    /// Fetches all launches (past and upcoming).
    async fn fetch_all(&self) -> Result<Vec<RawLaunch>>;

    /// Fetches a single launch by id.
    async fn fetch_launch(&self, launch_id: &str) -> Result<RawLaunch>;
}

/// HTTP client for the public SpaceX v4 API.
#[derive(Debug, Clone)]
pub struct SpaceXClient {
    http: reqwest::Client,
    base_url: String,
}

impl SpaceXClient {
    /// Creates a client against the default base URL with the default
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        Self::with_base_url(SPACEX_BASE_URL)
    }

    /// Creates a client against a custom base URL with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client with an explicit base URL and request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal {
                message: format!("failed to construct HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| classify_request_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::source_unavailable(
                url,
                format!("HTTP {status}: {body}"),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::source_with_cause(url, "response body is not valid JSON", e))
    }
}

fn classify_request_error(url: &str, error: reqwest::Error) -> Error {
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        format!("request failed: {error}")
    };
    Error::source_with_cause(url, message, error)
}

#[async_trait]
impl LaunchSource for SpaceXClient {
    async fn fetch_past(&self) -> Result<Vec<RawLaunch>> {
        tracing::info!(base_url = %self.base_url, "fetching past launches");
        self.get_json("/launches/past").await
    }

    async fn fetch_upcoming(&self) -> Result<Vec<RawLaunch>> {
        tracing::info!(base_url = %self.base_url, "fetching upcoming launches");
        self.get_json("/launches/upcoming").await
    }

    async fn fetch_all(&self) -> Result<Vec<RawLaunch>> {
        tracing::info!(base_url = %self.base_url, "fetching all launches");
        self.get_json("/launches").await
    }

    async fn fetch_launch(&self, launch_id: &str) -> Result<RawLaunch> {
        tracing::info!(launch_id = %launch_id, "fetching launch");
        self.get_json(&format!("/launches/{launch_id}")).await
    }
}
