//! Block storage backed by a PostgREST API, as exposed by Supabase.

use crate::{BlockRow, BlockStorage, StorageError, models::instant};
use async_trait::async_trait;
use chrono::SecondsFormat;
use insight_protocol::Block;
use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Connection settings for a [`PostgrestBlockStore`].
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// Project URL, e.g. `https://<project>.supabase.co`.
    pub url: Url,
    /// API key sent as both `apikey` and bearer token.
    pub api_key: String,
    /// Name of the blocks table.
    pub table: String,
    /// Upper bound for a single request.
    pub timeout: Duration,
}

impl PostgrestConfig {
    /// Default table name.
    pub const DEFAULT_TABLE: &'static str = "blocks";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a config for the default table and timeout.
    pub fn new(url: Url, api_key: impl Into<String>) -> Self {
        Self {
            url,
            api_key: api_key.into(),
            table: Self::DEFAULT_TABLE.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url.as_str().trim_end_matches('/'), self.table)
    }
}

/// Writes and reads blocks through the PostgREST interface of a Postgres `blocks` table.
///
/// Upserts resolve conflicts on `(zone, block_number)`, which requires a matching unique
/// constraint on the table.
#[derive(Debug, Clone)]
pub struct PostgrestBlockStore {
    http: reqwest::Client,
    config: PostgrestConfig,
}

impl PostgrestBlockStore {
    /// Conflict target of upserts.
    pub const CONFLICT_KEY: &'static str = "zone,block_number";

    /// Creates a new store.
    pub fn new(config: PostgrestConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    /// Returns the store configuration.
    pub const fn config(&self) -> &PostgrestConfig {
        &self.config
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
    }

    async fn select(&self, query: Vec<(&'static str, String)>) -> Result<Vec<Block>, StorageError> {
        let request = self.http.get(self.config.table_url()).query(&query);
        let response = check(self.authorized(request).send().await?).await?;
        let rows: Vec<BlockRow> = response.json().await?;
        Ok(rows.into_iter().map(Block::from).collect())
    }
}

/// Maps non-success responses to a [`StorageError`].
async fn check(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = format!("{status}: {body}");
    Err(match status {
        StatusCode::CONFLICT => StorageError::ConstraintViolation(message),
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            StorageError::ConnectionFailed(message)
        }
        _ => StorageError::Unknown(message),
    })
}

fn recent_query(zone: &str, limit: usize) -> Vec<(&'static str, String)> {
    vec![
        ("select", "*".to_string()),
        ("zone", format!("eq.{zone}")),
        ("order", "block_number.desc".to_string()),
        ("limit", limit.to_string()),
    ]
}

fn since_query(zone: &str, since: u64) -> Vec<(&'static str, String)> {
    let since = instant(since).to_rfc3339_opts(SecondsFormat::Millis, true);
    vec![
        ("select", "*".to_string()),
        ("zone", format!("eq.{zone}")),
        ("timestamp", format!("gte.{since}")),
        ("order", "timestamp.asc".to_string()),
    ]
}

#[async_trait]
impl BlockStorage for PostgrestBlockStore {
    async fn upsert_block(&self, block: &Block) -> Result<(), StorageError> {
        let row = BlockRow::from(block);
        let request = self
            .http
            .post(self.config.table_url())
            .query(&[("on_conflict", Self::CONFLICT_KEY)])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[row]);

        check(self.authorized(request).send().await?).await?;
        debug!(target: "storage", zone = %block.zone, number = block.number, "Upserted block");
        Ok(())
    }

    async fn fetch_recent_blocks(
        &self,
        zone: &str,
        limit: usize,
    ) -> Result<Vec<Block>, StorageError> {
        self.select(recent_query(zone, limit)).await
    }

    async fn fetch_blocks_since(&self, zone: &str, since: u64) -> Result<Vec<Block>, StorageError> {
        self.select(since_query(zone, since)).await
    }
}
