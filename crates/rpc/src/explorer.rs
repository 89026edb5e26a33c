//! Client for the QuaiScan block explorer REST API.

use crate::{Metrics, RpcError, client::bounded};
use chrono::DateTime;
use insight_protocol::{Block, NetworkStats, Transaction, ZONES, Zone, hex::parse_u256};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Base URL of the public QuaiScan v2 API.
pub const QUAISCAN_API_BASE: &str = "https://quaiscan.io/api/v2";

/// Read-only client for the block explorer.
///
/// The explorer is an optional collaborator: every method returns an [`RpcError`] on failure
/// and callers degrade to empty results.
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl ExplorerClient {
    /// Creates a client for the explorer API rooted at `base`.
    pub fn new(base: Url, timeout: Duration) -> Self {
        Self { http: reqwest::Client::new(), base, timeout }
    }

    /// Returns network wide statistics.
    pub async fn network_stats(&self) -> Result<NetworkStats, RpcError> {
        let stats: ExplorerStats = self.get("stats", &["stats"], &[]).await?;
        Ok(stats.into())
    }

    /// Returns up to `limit` recent blocks, optionally restricted to `zone`.
    pub async fn recent_blocks(
        &self,
        zone: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Block>, RpcError> {
        let query = with_shard(&[("type", "block")], zone);
        let page: Page<ExplorerBlock> = self.get("blocks", &["blocks"], &query).await?;
        Ok(page.take(limit).map(|b| b.into_block(zone)).collect())
    }

    /// Returns up to `limit` recently validated transactions, optionally restricted to `zone`.
    pub async fn recent_transactions(
        &self,
        zone: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Transaction>, RpcError> {
        let query = with_shard(&[("type", "validated")], zone);
        let page: Page<ExplorerTransaction> =
            self.get("transactions", &["transactions"], &query).await?;
        Ok(page.take(limit).map(|tx| tx.into_transaction(zone)).collect())
    }

    /// Returns up to `limit` validated transactions touching `address`.
    pub async fn address_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<Transaction>, RpcError> {
        let segments = ["addresses", address, "transactions"];
        let query = [("type", "validated".to_string())];
        let page: Page<ExplorerTransaction> =
            self.get("address_transactions", &segments, &query).await?;
        Ok(page.take(limit).map(|tx| tx.into_transaction(None)).collect())
    }

    /// Appends `segments` to the base URL. Each segment is percent-encoded, so caller input
    /// can never step outside its own path segment.
    fn url(&self, segments: &[&str]) -> Result<Url, RpcError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| RpcError::Transport {
                status: None,
                message: format!("explorer base {} cannot hold a path", self.base),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, RpcError> {
        let url = self.url(segments)?;
        debug!(target: "explorer", %url, ?query, "Fetching");

        let result = bounded(self.timeout, async {
            let response = self.http.get(url).query(query).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(RpcError::Transport {
                    status: Some(status.as_u16()),
                    message: format!("HTTP {status}"),
                });
            }
            response.json::<T>().await.map_err(|e| RpcError::InvalidResponse(e.to_string()))
        })
        .await;

        Metrics::record_explorer_request(endpoint, &result);
        result
    }
}

fn with_shard(base: &[(&'static str, &str)], zone: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query: Vec<_> = base.iter().map(|(k, v)| (*k, v.to_string())).collect();
    if let Some(zone) = zone {
        let shard =
            insight_protocol::zone(zone).map_or_else(|| zone.replace('-', ""), Zone::shard_param);
        query.push(("shard", shard));
    }
    query
}

/// Maps the explorer's shard name (`cyprus1`) back to the registry id (`cyprus-1`).
///
/// Shards the registry does not know are kept verbatim.
fn canonical_zone(shard: String) -> String {
    ZONES
        .iter()
        .find(|z| z.id == shard || z.shard_param() == shard)
        .map_or(shard, |z| z.id.to_string())
}

/// Parses a count the explorer may report as a number or a decimal string.
fn lenient_u64(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_timestamp(value: Option<&str>) -> Option<u64> {
    let parsed = DateTime::parse_from_rfc3339(value?).ok()?;
    u64::try_from(parsed.timestamp()).ok()
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

impl<T> Page<T> {
    fn take(self, limit: usize) -> impl Iterator<Item = T> {
        self.items.into_iter().take(limit)
    }
}

#[derive(Debug, Default, Deserialize)]
struct AddressRef {
    hash: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExplorerStats {
    #[serde(default)]
    total_blocks: Value,
    #[serde(default)]
    total_transactions: Value,
    #[serde(default)]
    total_addresses: Value,
    #[serde(default)]
    transactions_today: Value,
    #[serde(default)]
    average_block_time: Value,
    #[serde(default)]
    network_utilization_percentage: Value,
    #[serde(default)]
    coin_price: Value,
    #[serde(default)]
    market_cap: Value,
}

impl From<ExplorerStats> for NetworkStats {
    fn from(stats: ExplorerStats) -> Self {
        Self {
            total_blocks: lenient_u64(&stats.total_blocks),
            total_transactions: lenient_u64(&stats.total_transactions),
            total_addresses: lenient_u64(&stats.total_addresses),
            transactions_today: lenient_u64(&stats.transactions_today),
            average_block_time: lenient_f64(&stats.average_block_time)
                .filter(|t| *t > 0.0)
                .unwrap_or(Self::DEFAULT_BLOCK_TIME_MS),
            network_utilization: lenient_f64(&stats.network_utilization_percentage)
                .unwrap_or_default(),
            coin_price: lenient_string(&stats.coin_price),
            market_cap: lenient_string(&stats.market_cap),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExplorerBlock {
    #[serde(default)]
    height: u64,
    hash: Option<String>,
    parent_hash: Option<String>,
    timestamp: Option<String>,
    #[serde(default)]
    tx_count: Value,
    #[serde(default)]
    gas_used: Value,
    #[serde(default)]
    miner: Option<AddressRef>,
    shard: Option<String>,
}

impl ExplorerBlock {
    fn into_block(self, zone: Option<&str>) -> Block {
        Block {
            zone: self
                .shard
                .map(canonical_zone)
                .or_else(|| zone.map(str::to_string))
                .unwrap_or_default(),
            number: self.height,
            hash: self.hash.unwrap_or_else(|| Block::UNKNOWN_HASH.to_string()),
            parent_hash: self.parent_hash.unwrap_or_else(|| Block::UNKNOWN_HASH.to_string()),
            timestamp: parse_timestamp(self.timestamp.as_deref()).unwrap_or_default(),
            tx_count: u32::try_from(lenient_u64(&self.tx_count)).unwrap_or(u32::MAX),
            gas_used: lenient_u64(&self.gas_used),
            miner: self.miner.and_then(|m| m.hash),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExplorerTransaction {
    #[serde(default)]
    hash: String,
    from: Option<AddressRef>,
    to: Option<AddressRef>,
    value: Option<String>,
    #[serde(default)]
    gas_used: Value,
    timestamp: Option<String>,
    status: Option<String>,
    #[serde(rename = "type")]
    tx_type: Option<String>,
    shard: Option<String>,
}

impl ExplorerTransaction {
    fn into_transaction(self, zone: Option<&str>) -> Transaction {
        Transaction {
            hash: self.hash,
            from: self.from.and_then(|a| a.hash),
            to: self.to.and_then(|a| a.hash),
            value: self.value.and_then(|v| parse_u256(&v).ok()).unwrap_or_default(),
            timestamp: parse_timestamp(self.timestamp.as_deref()),
            zone: self.shard.map(canonical_zone).or_else(|| zone.map(str::to_string)),
            gas_used: (!self.gas_used.is_null()).then(|| lenient_u64(&self.gas_used)),
            status: self.status,
            tx_type: self.tx_type,
        }
    }
}
