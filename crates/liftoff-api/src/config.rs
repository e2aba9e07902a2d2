//! Server configuration.
//!
//! All runtime configuration comes from `LIFTOFF_*` environment variables;
//! [`Config::from_env`] is the canonical path for container deployments.

use serde::{Deserialize, Serialize};

use liftoff_core::{Error, Result};
use liftoff_sync::source::{DEFAULT_TIMEOUT_SECS, SPACEX_BASE_URL};

/// Configuration for the liftoff API server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server port.
    pub http_port: u16,

    /// Enable debug mode.
    ///
    /// When enabled the in-memory table backend is allowed and logs are
    /// pretty-printed; when disabled a DynamoDB table must be configured and
    /// logs are JSON.
    pub debug: bool,

    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,

    /// Source API configuration.
    #[serde(default)]
    pub source: SourceConfig,

    /// Storage configuration (table/backend selection).
    #[serde(default)]
    pub storage: StorageConfig,

    /// Version string reported by `/health` and the root descriptor.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 8080,
            debug: false,
            cors: CorsConfig::default(),
            source: SourceConfig::default(),
            storage: StorageConfig::default(),
            version: default_version(),
        }
    }
}

/// CORS configuration for browser-based access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. Use `["*"]` to allow all origins (development only).
    /// Empty list disables CORS entirely.
    pub allowed_origins: Vec<String>,

    /// Max age for preflight cache (seconds).
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            // Disabled unless origins are configured explicitly.
            allowed_origins: Vec::new(),
            max_age_seconds: 3600,
        }
    }
}

/// Source API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the launch data API.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: SPACEX_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Storage configuration for the API server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// DynamoDB table name. When unset, the in-memory backend is used
    /// (debug only).
    #[serde(default)]
    pub table: Option<String>,

    /// AWS region override.
    #[serde(default)]
    pub region: Option<String>,

    /// DynamoDB endpoint override (e.g. DynamoDB Local).
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Per-operation timeout in milliseconds (backend default when unset).
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Supported env vars:
    /// - `LIFTOFF_HTTP_PORT`
    /// - `LIFTOFF_DEBUG`
    /// - `LIFTOFF_CORS_ALLOWED_ORIGINS` (comma-separated, or `*`)
    /// - `LIFTOFF_CORS_MAX_AGE_SECONDS`
    /// - `LIFTOFF_SOURCE_BASE_URL`
    /// - `LIFTOFF_SOURCE_TIMEOUT_SECS`
    /// - `LIFTOFF_TABLE_NAME`
    /// - `LIFTOFF_AWS_REGION`
    /// - `LIFTOFF_DYNAMODB_ENDPOINT`
    /// - `LIFTOFF_STORAGE_TIMEOUT_MS`
    /// - `LIFTOFF_APP_VERSION`
    ///
    /// # Errors
    ///
    /// Returns an error if any environment variable is present but cannot be
    /// parsed.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(port) = env_u16("LIFTOFF_HTTP_PORT")? {
            config.http_port = port;
        }
        if let Some(debug) = env_bool("LIFTOFF_DEBUG")? {
            config.debug = debug;
        }

        if let Some(origins) = env_string("LIFTOFF_CORS_ALLOWED_ORIGINS") {
            config.cors.allowed_origins = parse_cors_allowed_origins(&origins);
        }
        if let Some(max_age) = env_u64("LIFTOFF_CORS_MAX_AGE_SECONDS")? {
            config.cors.max_age_seconds = max_age;
        }

        if let Some(base_url) = env_string("LIFTOFF_SOURCE_BASE_URL") {
            config.source.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = env_u64("LIFTOFF_SOURCE_TIMEOUT_SECS")? {
            if timeout == 0 {
                return Err(Error::InvalidInput(
                    "LIFTOFF_SOURCE_TIMEOUT_SECS must be greater than 0".to_string(),
                ));
            }
            config.source.timeout_secs = timeout;
        }

        if let Some(table) = env_string("LIFTOFF_TABLE_NAME") {
            config.storage.table = Some(table);
        }
        if let Some(region) = env_string("LIFTOFF_AWS_REGION") {
            config.storage.region = Some(region);
        }
        if let Some(endpoint) = env_string("LIFTOFF_DYNAMODB_ENDPOINT") {
            config.storage.endpoint = Some(endpoint);
        }
        if let Some(timeout_ms) = env_u64("LIFTOFF_STORAGE_TIMEOUT_MS")? {
            config.storage.timeout_ms = Some(timeout_ms);
        }

        if let Some(version) = env_string("LIFTOFF_APP_VERSION") {
            config.version = version;
        }

        Ok(config)
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn env_u16(name: &str) -> Result<Option<u16>> {
    let Some(v) = env_string(name) else {
        return Ok(None);
    };
    v.parse::<u16>()
        .map(Some)
        .map_err(|e| Error::InvalidInput(format!("{name} must be a u16: {e}")))
}

fn env_u64(name: &str) -> Result<Option<u64>> {
    let Some(v) = env_string(name) else {
        return Ok(None);
    };
    v.parse::<u64>()
        .map(Some)
        .map_err(|e| Error::InvalidInput(format!("{name} must be a u64: {e}")))
}

fn env_bool(name: &str) -> Result<Option<bool>> {
    let Some(v) = env_string(name) else {
        return Ok(None);
    };
    parse_bool(name, &v).map(Some)
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    let value = value.trim().to_ascii_lowercase();
    match value.as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        _ => Err(Error::InvalidInput(format!(
            "{name} must be a boolean (true/false/1/0)"
        ))),
    }
}

fn parse_cors_allowed_origins(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed == "*" {
        return vec!["*".to_string()];
    }

    trimmed
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
