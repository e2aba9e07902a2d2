//! Launch read API routes.
//!
//! ## Routes
//!
//! - `GET /launches` - List launches (optional status filter and limit)
//! - `GET /launches/stats` - Aggregate statistics
//! - `GET /launches/{launch_id}` - Get one launch by id

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use liftoff_core::launch::{LaunchRecord, LaunchStats, LaunchStatus};

use crate::error::{ApiError, ApiErrorBody};
use crate::server::AppState;

/// Largest accepted `limit` query value.
const MAX_LIMIT: usize = 500;

/// Query parameters for listing launches.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListLaunchesParams {
    /// Filter by launch status (success, failed, upcoming, unknown).
    pub status: Option<String>,
    /// Maximum number of results (1-500); only applies without a filter.
    pub limit: Option<usize>,
}

/// A stored launch, as served to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct LaunchResponse {
    /// Unique launch identifier.
    pub launch_id: String,
    /// Mission name.
    pub mission_name: String,
    /// Rocket name.
    pub rocket_name: String,
    /// Launch date (ISO 8601 UTC).
    pub launch_date: String,
    /// Derived launch status.
    pub status: String,
    /// Launchpad name.
    pub launchpad: String,
    /// Flight number.
    pub flight_number: String,
    /// Launch details.
    pub details: String,
    /// Payload identifiers.
    pub payloads: Vec<String>,
    /// Webcast URL.
    pub webcast_url: String,
    /// Article URL.
    pub article_url: String,
    /// Wikipedia URL.
    pub wikipedia_url: String,
    /// Small mission patch URL.
    pub patch_small: String,
    /// Large mission patch URL.
    pub patch_large: String,
}

impl From<LaunchRecord> for LaunchResponse {
    fn from(record: LaunchRecord) -> Self {
        Self {
            launch_id: record.launch_id,
            mission_name: record.mission_name,
            rocket_name: record.rocket_name,
            launch_date: record.launch_date,
            status: record.status.as_str().to_string(),
            launchpad: record.launchpad,
            flight_number: record.flight_number,
            details: record.details,
            payloads: record.payloads,
            webcast_url: record.webcast_url,
            article_url: record.article_url,
            wikipedia_url: record.wikipedia_url,
            patch_small: record.patch_small,
            patch_large: record.patch_large,
        }
    }
}

/// Aggregate launch statistics.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Total stored launches.
    pub total: usize,
    /// Successful launches.
    pub success: usize,
    /// Failed launches.
    pub failed: usize,
    /// Upcoming launches.
    pub upcoming: usize,
    /// Success percentage over completed launches, one decimal.
    pub success_rate: f64,
}

impl From<LaunchStats> for StatsResponse {
    fn from(stats: LaunchStats) -> Self {
        Self {
            total: stats.total,
            success: stats.success,
            failed: stats.failed,
            upcoming: stats.upcoming,
            success_rate: stats.success_rate,
        }
    }
}

/// Creates launch routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/launches", get(list_launches))
        .route("/launches/stats", get(get_stats))
        .route("/launches/:launch_id", get(get_launch))
}

/// List stored launches.
///
/// GET /api/v1/launches
#[utoipa::path(
    get,
    path = "/api/v1/launches",
    tag = "launches",
    params(ListLaunchesParams),
    responses(
        (status = 200, description = "Launches listed, newest first", body = [LaunchResponse]),
        (status = 400, description = "Bad request", body = ApiErrorBody),
        (status = 500, description = "Internal error", body = ApiErrorBody),
    )
)]
pub(crate) async fn list_launches(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListLaunchesParams>,
) -> Result<impl IntoResponse, ApiError> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<LaunchStatus>)
        .transpose()
        .map_err(ApiError::from)?;

    if let Some(limit) = params.limit {
        if limit == 0 || limit > MAX_LIMIT {
            return Err(ApiError::bad_request(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
    }

    tracing::debug!(status = ?status, limit = ?params.limit, "listing launches");

    let launches = state
        .query_service()
        .list(status, params.limit)
        .await
        .map_err(ApiError::from)?;

    let body: Vec<LaunchResponse> = launches.into_iter().map(LaunchResponse::from).collect();
    Ok(Json(body))
}

/// Aggregate statistics over all stored launches.
///
/// GET /api/v1/launches/stats
#[utoipa::path(
    get,
    path = "/api/v1/launches/stats",
    tag = "launches",
    responses(
        (status = 200, description = "Statistics computed", body = StatsResponse),
        (status = 500, description = "Internal error", body = ApiErrorBody),
    )
)]
pub(crate) async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!("computing launch stats");

    let stats = state.query_service().stats().await.map_err(ApiError::from)?;
    Ok(Json(StatsResponse::from(stats)))
}

/// Get a launch by id.
///
/// GET /api/v1/launches/{launch_id}
#[utoipa::path(
    get,
    path = "/api/v1/launches/{launch_id}",
    tag = "launches",
    params(
        ("launch_id" = String, Path, description = "Launch identifier")
    ),
    responses(
        (status = 200, description = "Launch found", body = LaunchResponse),
        (status = 404, description = "Not found", body = ApiErrorBody),
        (status = 500, description = "Internal error", body = ApiErrorBody),
    )
)]
pub(crate) async fn get_launch(
    State(state): State<Arc<AppState>>,
    Path(launch_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!(launch_id = %launch_id, "getting launch");

    let record = state
        .query_service()
        .get(&launch_id)
        .await
        .map_err(ApiError::from)?;
    Ok(Json(LaunchResponse::from(record)))
}
