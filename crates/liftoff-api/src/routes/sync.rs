//! Manual sync trigger route.
//!
//! ## Routes
//!
//! - `POST /trigger` - Run one sync against the source API

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use liftoff_core::launch::{LaunchPreview, SyncSummary};

use crate::error::{ApiError, ApiErrorBody};
use crate::server::AppState;

/// Summary of a completed sync run.
#[derive(Debug, Serialize, ToSchema)]
pub struct SyncResponse {
    /// Records obtained from the source API.
    pub total_fetched: usize,
    /// Records newly inserted.
    pub inserted: usize,
    /// Records that replaced an existing row.
    pub updated: usize,
    /// Records whose individual upsert failed.
    pub errors: usize,
    /// Preview of the first 10 processed records.
    pub launches: Vec<SyncLaunchPreview>,
}

/// Preview entry of one processed launch.
#[derive(Debug, Serialize, ToSchema)]
pub struct SyncLaunchPreview {
    /// Launch identifier.
    pub launch_id: String,
    /// Mission name.
    pub mission_name: String,
    /// Launch date (ISO 8601 UTC).
    pub launch_date: String,
    /// Derived status.
    pub status: String,
}

impl From<LaunchPreview> for SyncLaunchPreview {
    fn from(preview: LaunchPreview) -> Self {
        Self {
            launch_id: preview.launch_id,
            mission_name: preview.mission_name,
            launch_date: preview.launch_date,
            status: preview.status.as_str().to_string(),
        }
    }
}

impl From<SyncSummary> for SyncResponse {
    fn from(summary: SyncSummary) -> Self {
        Self {
            total_fetched: summary.total_fetched,
            inserted: summary.inserted,
            updated: summary.updated,
            errors: summary.errors,
            launches: summary
                .launches
                .into_iter()
                .map(SyncLaunchPreview::from)
                .collect(),
        }
    }
}

/// Creates sync routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/trigger", post(trigger_sync))
}

/// Run one sync against the source API.
///
/// POST /api/v1/trigger
#[utoipa::path(
    post,
    path = "/api/v1/trigger",
    tag = "sync",
    responses(
        (status = 200, description = "Sync completed", body = SyncResponse),
        (status = 502, description = "Source API unavailable", body = ApiErrorBody),
        (status = 500, description = "Internal error", body = ApiErrorBody),
    )
)]
pub(crate) async fn trigger_sync(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("manual sync triggered");

    let summary = state.sync_runner().run().await.map_err(ApiError::from)?;
    Ok(Json(SyncResponse::from(summary)))
}
