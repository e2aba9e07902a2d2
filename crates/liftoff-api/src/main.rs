//! `liftoff-api` binary entrypoint.
//!
//! Loads configuration from environment variables, selects the table
//! backend, and starts the HTTP server.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use std::sync::Arc;

use anyhow::Result;

use liftoff_api::config::Config;
use liftoff_api::server::Server;
use liftoff_core::dynamo::{DynamoTable, DynamoTableConfig};
use liftoff_core::observability::{LogFormat, init_logging};
use liftoff_core::table::{LaunchTable, MemoryTable};

fn choose_log_format(config: &Config) -> LogFormat {
    if config.debug {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    init_logging(choose_log_format(&config));

    let table: Arc<dyn LaunchTable> = if let Some(table_name) = config.storage.table.clone() {
        tracing::info!(table = %table_name, "Using DynamoDB table backend");
        Arc::new(
            DynamoTable::connect(DynamoTableConfig {
                table_name,
                region: config.storage.region.clone(),
                endpoint: config.storage.endpoint.clone(),
                timeout_ms: config.storage.timeout_ms,
            })
            .await?,
        )
    } else {
        if !config.debug {
            anyhow::bail!("LIFTOFF_TABLE_NAME is required when LIFTOFF_DEBUG=false");
        }
        tracing::warn!("LIFTOFF_TABLE_NAME not set; using in-memory table (debug only)");
        Arc::new(MemoryTable::new())
    };

    let server = Server::new(config)?.with_table(table);
    server.serve().await?;
    Ok(())
}
