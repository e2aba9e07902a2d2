//! DynamoDB table backend.
//!
//! Stores launch records in a single table keyed by `launch_id` with a
//! `status-index` global secondary index. Scans page through
//! `LastEvaluatedKey`/`ExclusiveStartKey`; because the table's primary key
//! is the single `launch_id` attribute, the continuation token exposed
//! through [`LaunchTable`] is that id string.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_smithy_types::timeout::TimeoutConfig;

use crate::error::{Error, Result};
use crate::launch::{LaunchRecord, LaunchStatus};
use crate::table::{LaunchTable, ScanPage};

const ATTR_LAUNCH_ID: &str = "launch_id";
const ATTR_MISSION_NAME: &str = "mission_name";
const ATTR_ROCKET_NAME: &str = "rocket_name";
const ATTR_LAUNCH_DATE: &str = "launch_date";
const ATTR_STATUS: &str = "status";
const ATTR_LAUNCHPAD: &str = "launchpad";
const ATTR_FLIGHT_NUMBER: &str = "flight_number";
const ATTR_DETAILS: &str = "details";
const ATTR_PAYLOADS: &str = "payloads";
const ATTR_WEBCAST_URL: &str = "webcast_url";
const ATTR_ARTICLE_URL: &str = "article_url";
const ATTR_WIKIPEDIA_URL: &str = "wikipedia_url";
const ATTR_PATCH_SMALL: &str = "patch_small";
const ATTR_PATCH_LARGE: &str = "patch_large";

const STATUS_INDEX: &str = "status-index";

/// DynamoDB backend configuration.
#[derive(Debug, Clone)]
pub struct DynamoTableConfig {
    /// Table name.
    pub table_name: String,
    /// AWS region override (SDK default when unset).
    pub region: Option<String>,
    /// Endpoint override (e.g. DynamoDB Local / LocalStack).
    pub endpoint: Option<String>,
    /// Per-operation timeout in milliseconds (backend default when unset).
    pub timeout_ms: Option<u64>,
}

/// DynamoDB-backed launch table.
#[derive(Clone)]
pub struct DynamoTable {
    client: Client,
    table_name: String,
}

impl std::fmt::Debug for DynamoTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoTable")
            .field("table_name", &self.table_name)
            .finish_non_exhaustive()
    }
}

impl DynamoTable {
    /// Connects to DynamoDB using the ambient AWS configuration with the
    /// overrides in `config` applied.
    ///
    /// # Errors
    ///
    /// Currently infallible beyond SDK construction; kept fallible so
    /// credential/endpoint validation can be added without breaking callers.
    pub async fn connect(config: DynamoTableConfig) -> Result<Self> {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;

        // Inherit HTTP client, credentials, and retry config from the
        // ambient SDK config, then apply our overrides.
        let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
        if let Some(region) = config.region {
            builder = builder.region(Region::new(region));
        }
        if let Some(endpoint) = config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(Duration::from_millis(timeout_ms))
                    .build(),
            );
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            table_name: config.table_name,
        })
    }

    /// Creates a backend from a pre-built client (for tests against
    /// DynamoDB Local).
    #[must_use]
    pub fn from_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

fn string_attr(item: &HashMap<String, AttributeValue>, attr: &str) -> String {
    item.get(attr)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .unwrap_or_default()
}

/// Converts a DynamoDB item to a launch record.
///
/// Returns `None` when the primary key attribute is missing; every other
/// attribute falls back to its empty/unknown default.
fn item_to_record(item: &HashMap<String, AttributeValue>) -> Option<LaunchRecord> {
    let launch_id = item.get(ATTR_LAUNCH_ID)?.as_s().ok()?.clone();

    let status = item
        .get(ATTR_STATUS)
        .and_then(|v| v.as_s().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(LaunchStatus::Unknown);

    let payloads = item
        .get(ATTR_PAYLOADS)
        .and_then(|v| v.as_l().ok())
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.as_s().ok().cloned())
                .collect()
        })
        .unwrap_or_default();

    Some(LaunchRecord {
        launch_id,
        mission_name: string_attr(item, ATTR_MISSION_NAME),
        rocket_name: string_attr(item, ATTR_ROCKET_NAME),
        launch_date: string_attr(item, ATTR_LAUNCH_DATE),
        status,
        launchpad: string_attr(item, ATTR_LAUNCHPAD),
        flight_number: string_attr(item, ATTR_FLIGHT_NUMBER),
        details: string_attr(item, ATTR_DETAILS),
        payloads,
        webcast_url: string_attr(item, ATTR_WEBCAST_URL),
        article_url: string_attr(item, ATTR_ARTICLE_URL),
        wikipedia_url: string_attr(item, ATTR_WIKIPEDIA_URL),
        patch_small: string_attr(item, ATTR_PATCH_SMALL),
        patch_large: string_attr(item, ATTR_PATCH_LARGE),
    })
}

fn record_to_item(record: &LaunchRecord) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();
    item.insert(
        ATTR_LAUNCH_ID.to_string(),
        AttributeValue::S(record.launch_id.clone()),
    );
    item.insert(
        ATTR_MISSION_NAME.to_string(),
        AttributeValue::S(record.mission_name.clone()),
    );
    item.insert(
        ATTR_ROCKET_NAME.to_string(),
        AttributeValue::S(record.rocket_name.clone()),
    );
    item.insert(
        ATTR_LAUNCH_DATE.to_string(),
        AttributeValue::S(record.launch_date.clone()),
    );
    item.insert(
        ATTR_STATUS.to_string(),
        AttributeValue::S(record.status.as_str().to_string()),
    );
    item.insert(
        ATTR_LAUNCHPAD.to_string(),
        AttributeValue::S(record.launchpad.clone()),
    );
    item.insert(
        ATTR_FLIGHT_NUMBER.to_string(),
        AttributeValue::S(record.flight_number.clone()),
    );
    item.insert(
        ATTR_DETAILS.to_string(),
        AttributeValue::S(record.details.clone()),
    );
    item.insert(
        ATTR_PAYLOADS.to_string(),
        AttributeValue::L(
            record
                .payloads
                .iter()
                .map(|p| AttributeValue::S(p.clone()))
                .collect(),
        ),
    );
    item.insert(
        ATTR_WEBCAST_URL.to_string(),
        AttributeValue::S(record.webcast_url.clone()),
    );
    item.insert(
        ATTR_ARTICLE_URL.to_string(),
        AttributeValue::S(record.article_url.clone()),
    );
    item.insert(
        ATTR_WIKIPEDIA_URL.to_string(),
        AttributeValue::S(record.wikipedia_url.clone()),
    );
    item.insert(
        ATTR_PATCH_SMALL.to_string(),
        AttributeValue::S(record.patch_small.clone()),
    );
    item.insert(
        ATTR_PATCH_LARGE.to_string(),
        AttributeValue::S(record.patch_large.clone()),
    );
    item
}

#[async_trait]
impl LaunchTable for DynamoTable {
    async fn get(&self, launch_id: &str) -> Result<Option<LaunchRecord>> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ATTR_LAUNCH_ID, AttributeValue::S(launch_id.to_string()))
            .send()
            .await
            .map_err(|e| {
                Error::storage_with_source(format!("GetItem failed for launch {launch_id}"), e)
            })?;

        Ok(response.item().and_then(item_to_record))
    }

    async fn put(&self, record: LaunchRecord) -> Result<()> {
        let launch_id = record.launch_id.clone();
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(&record)))
            .send()
            .await
            .map_err(|e| {
                Error::storage_with_source(format!("PutItem failed for launch {launch_id}"), e)
            })?;
        Ok(())
    }

    async fn query_status(&self, status: LaunchStatus) -> Result<Vec<LaunchRecord>> {
        // `status` is a DynamoDB reserved word, hence the attribute-name
        // placeholder.
        let response = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(STATUS_INDEX)
            .key_condition_expression("#st = :status")
            .expression_attribute_names("#st", ATTR_STATUS)
            .expression_attribute_values(
                ":status",
                AttributeValue::S(status.as_str().to_string()),
            )
            .send()
            .await
            .map_err(|e| {
                Error::storage_with_source(format!("Query failed for status {status}"), e)
            })?;

        Ok(response.items().iter().filter_map(item_to_record).collect())
    }

    async fn scan_page(&self, start: Option<&str>, limit: Option<usize>) -> Result<ScanPage> {
        let mut request = self.client.scan().table_name(&self.table_name);

        if let Some(token) = start {
            request = request.exclusive_start_key(
                ATTR_LAUNCH_ID,
                AttributeValue::S(token.to_string()),
            );
        }
        if let Some(limit) = limit {
            request = request.limit(i32::try_from(limit).unwrap_or(i32::MAX));
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::storage_with_source("Scan failed", e))?;

        let records = response.items().iter().filter_map(item_to_record).collect();
        let next = response
            .last_evaluated_key()
            .and_then(|key| key.get(ATTR_LAUNCH_ID))
            .and_then(|v| v.as_s().ok())
            .cloned();

        Ok(ScanPage { records, next })
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|e| {
                Error::storage_with_source(
                    format!("DescribeTable failed for {}", self.table_name),
                    e,
                )
            })?;
        Ok(())
    }
}
