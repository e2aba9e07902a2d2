//! `OpenAPI` specification generation for `liftoff-api`.
//!
//! Served at `/openapi.json`; used to generate external clients and to
//! detect breaking API changes in CI.

use utoipa::OpenApi;

/// `OpenAPI` documentation for the liftoff REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Liftoff Launch Tracker API",
        description ="REST API for querying and syncing launch records. \
                       Records are stored in a keyed table and refreshed from \
                       the public launch data API on demand via /trigger.",
        license(name = "MIT"),
    ),
    paths(
        crate::routes::launches::list_launches,
        crate::routes::launches::get_stats,
        crate::routes::launches::get_launch,
        crate::routes::sync::trigger_sync,
    ),
    components(
        schemas(
            crate::error::ApiErrorBody,
            crate::routes::launches::LaunchResponse,
            crate::routes::launches::StatsResponse,
            crate::routes::sync::SyncResponse,
            crate::routes::sync::SyncLaunchPreview,
        )
    ),
    tags(
        (name = "launches", description = "Launch read operations"),
        (name = "sync", description = "Manual sync trigger"),
    )
)]
pub struct ApiDoc;

/// Returns the generated `OpenAPI` spec.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_contains_every_route() {
        let spec = openapi();
        let paths: Vec<_> = spec.paths.paths.keys().cloned().collect();
        assert!(paths.contains(&"/api/v1/launches".to_string()));
        assert!(paths.contains(&"/api/v1/launches/stats".to_string()));
        assert!(paths.contains(&"/api/v1/launches/{launch_id}".to_string()));
        assert!(paths.contains(&"/api/v1/trigger".to_string()));
    }
}
