//! API server implementation.
//!
//! Wires the table backend, source client, and route handlers into one
//! axum router, and owns the health endpoint and CORS policy.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderValue, Method, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use liftoff_core::table::{LaunchTable, MemoryTable};
use liftoff_core::{Error, Result};
use liftoff_store::{LaunchRepository, QueryService};
use liftoff_sync::source::{LaunchSource, SpaceXClient};
use liftoff_sync::runner::SyncRunner;

use crate::config::{Config, CorsConfig};

// ============================================================================
// Health and root responses
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status: `ok` or `degraded`.
    pub status: String,
    /// Storage reachability: `ok` or `error`.
    pub storage: String,
    /// Service version.
    pub version: String,
}

/// Root service descriptor.
#[derive(Debug, Serialize)]
struct ServiceInfo {
    service: &'static str,
    version: String,
    docs: &'static str,
}

// ============================================================================
// Application state
// ============================================================================

/// Shared application state for all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Config,
    table: Arc<dyn LaunchTable>,
    source: Arc<dyn LaunchSource>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("table", &"<LaunchTable>")
            .field("source", &"<LaunchSource>")
            .finish()
    }
}

impl AppState {
    /// Creates new application state.
    #[must_use]
    pub fn new(config: Config, table: Arc<dyn LaunchTable>, source: Arc<dyn LaunchSource>) -> Self {
        Self {
            config,
            table,
            source,
        }
    }

    /// Returns the table backend.
    #[must_use]
    pub fn table(&self) -> Arc<dyn LaunchTable> {
        Arc::clone(&self.table)
    }

    /// Builds the read façade over the table backend.
    #[must_use]
    pub fn query_service(&self) -> QueryService {
        QueryService::new(LaunchRepository::new(self.table()))
    }

    /// Builds a sync runner over the source client and table backend.
    #[must_use]
    pub fn sync_runner(&self) -> SyncRunner {
        SyncRunner::new(Arc::clone(&self.source), LaunchRepository::new(self.table()))
    }
}

// ============================================================================
// Route handlers
// ============================================================================

/// Health check endpoint handler.
///
/// Always returns 200; storage trouble is reported in the body so operators
/// and load balancers can distinguish "up" from "up but degraded".
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let storage_ok = match state.table().ping().await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "storage health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if storage_ok { "ok" } else { "degraded" }.to_string(),
        storage: if storage_ok { "ok" } else { "error" }.to_string(),
        version: state.config.version.clone(),
    })
}

/// Root service descriptor handler. Not part of the documented API.
async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ServiceInfo {
        service: "liftoff-api",
        version: state.config.version.clone(),
        docs: "/openapi.json",
    })
}

/// Serves the generated `OpenAPI` specification.
async fn serve_openapi() -> impl IntoResponse {
    Json(crate::openapi::openapi())
}

// ============================================================================
// Server
// ============================================================================

/// The liftoff API server.
pub struct Server {
    config: Config,
    table: Arc<dyn LaunchTable>,
    source: Arc<dyn LaunchSource>,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("table", &"<LaunchTable>")
            .field("source", &"<LaunchSource>")
            .finish()
    }
}

impl Server {
    /// Creates a new server with the given configuration.
    ///
    /// Defaults to the in-memory table backend and the HTTP source client
    /// built from `config.source`; use [`Server::with_table`] /
    /// [`Server::with_source`] to override.
    ///
    /// # Errors
    ///
    /// Returns an error if the source HTTP client cannot be constructed.
    pub fn new(config: Config) -> Result<Self> {
        let source = SpaceXClient::with_timeout(
            config.source.base_url.clone(),
            Duration::from_secs(config.source.timeout_secs),
        )?;
        Ok(Self {
            config,
            table: Arc::new(MemoryTable::new()),
            source: Arc::new(source),
        })
    }

    /// Replaces the table backend.
    #[must_use]
    pub fn with_table(mut self, table: Arc<dyn LaunchTable>) -> Self {
        self.table = table;
        self
    }

    /// Replaces the launch source.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn LaunchSource>) -> Self {
        self.source = source;
        self
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Creates the router with all routes and middleware.
    fn create_router(&self) -> Router {
        let state = Arc::new(AppState::new(
            self.config.clone(),
            Arc::clone(&self.table),
            Arc::clone(&self.source),
        ));

        let cors = self.build_cors_layer();

        Router::new()
            .route("/", get(root))
            .route("/health", get(health))
            .route("/openapi.json", get(serve_openapi))
            .nest("/api/v1", crate::routes::api_v1_routes())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Builds the CORS layer from configuration.
    fn build_cors_layer(&self) -> CorsLayer {
        let cors_config = &self.config.cors;
        let cors = Self::build_cors_base(cors_config);
        Self::apply_cors_allowed_origins(cors, cors_config)
    }

    fn build_cors_base(cors_config: &CorsConfig) -> CorsLayer {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::HEAD, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .expose_headers([header::CONTENT_TYPE, header::CONTENT_LENGTH])
            .max_age(Duration::from_secs(cors_config.max_age_seconds))
    }

    fn cors_allows_any_origin(cors_config: &CorsConfig) -> bool {
        cors_config.allowed_origins.len() == 1
            && cors_config
                .allowed_origins
                .first()
                .is_some_and(|origin| origin == "*")
    }

    fn apply_cors_allowed_origins(cors: CorsLayer, cors_config: &CorsConfig) -> CorsLayer {
        if cors_config.allowed_origins.is_empty() {
            return cors;
        }

        if Self::cors_allows_any_origin(cors_config) {
            return cors.allow_origin(Any);
        }

        if cors_config
            .allowed_origins
            .iter()
            .any(|origin| origin == "*")
        {
            tracing::error!(
                origins = ?cors_config.allowed_origins,
                "Invalid CORS config: '*' must be the only allowed origin"
            );
            return cors;
        }

        let allowed: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::error!(origin = %origin, "Invalid CORS origin; skipping");
                    None
                }
            })
            .collect();

        if allowed.is_empty() {
            tracing::warn!("All configured CORS origins were invalid; disabling CORS");
            cors
        } else {
            tracing::info!(origins = ?cors_config.allowed_origins, "CORS configured");
            cors.allow_origin(AllowOrigin::list(allowed))
        }
    }

    fn validate_config(&self) -> Result<()> {
        // No wildcard CORS outside debug.
        if !self.config.debug
            && self
                .config
                .cors
                .allowed_origins
                .iter()
                .any(|origin| origin == "*")
        {
            return Err(Error::InvalidInput(
                "cors.allowed_origins cannot include '*' when debug=false".to_string(),
            ));
        }

        if !self.config.debug && self.config.storage.table.is_none() {
            return Err(Error::InvalidInput(
                "storage.table is required when debug=false".to_string(),
            ));
        }

        Ok(())
    }

    /// Starts the server and blocks until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the server cannot
    /// bind to the port.
    pub async fn serve(&self) -> Result<()> {
        self.validate_config()?;

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let router = self.create_router();

        tracing::info!(http_port = self.config.http_port, "Starting liftoff API server");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Internal {
                message: format!("failed to bind to {addr}: {e}"),
            })?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal {
                message: format!("server error: {e}"),
            })?;

        Ok(())
    }

    /// Creates a test router for the server.
    ///
    /// Useful for integration tests that exercise the routes without binding
    /// a port.
    #[doc(hidden)]
    #[must_use]
    pub fn test_router(&self) -> Router {
        self.create_router()
    }
}
