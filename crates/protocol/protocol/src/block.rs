//! Canonical chain data shapes.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// A block as stored and served by the data core.
///
/// Blocks are identified by `(zone, number)`: zones produce blocks independently, so the same
/// height exists once per zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// The zone that produced the block.
    pub zone: String,
    /// Block height within the zone.
    pub number: u64,
    /// Block hash, or `"unknown"` when the source omitted it.
    pub hash: String,
    /// Parent block hash, or `"unknown"` when the source omitted it.
    pub parent_hash: String,
    /// Block timestamp in unix seconds.
    pub timestamp: u64,
    /// Number of transactions in the block.
    pub tx_count: u32,
    /// Gas used by all transactions in the block.
    pub gas_used: u64,
    /// The block producer, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miner: Option<String>,
}

impl Block {
    /// Placeholder used for hashes the source did not report.
    pub const UNKNOWN_HASH: &'static str = "unknown";

    /// Returns the `(zone, number)` pair identifying this block.
    pub fn key(&self) -> (&str, u64) {
        (&self.zone, self.number)
    }
}

/// A transaction observed on chain. Transactions are never persisted by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction hash.
    pub hash: String,
    /// Sender address.
    pub from: Option<String>,
    /// Recipient address, absent for contract creations.
    pub to: Option<String>,
    /// Transferred value in the smallest unit.
    pub value: U256,
    /// Inclusion time in unix seconds, when known.
    pub timestamp: Option<u64>,
    /// The zone the transaction was observed in, when known.
    pub zone: Option<String>,
    /// Gas used by the transaction, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<u64>,
    /// Execution status as reported by the explorer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Transaction type as reported by the explorer.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub tx_type: Option<String>,
}

/// Network wide statistics reported by the block explorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    /// Total number of blocks.
    pub total_blocks: u64,
    /// Total number of transactions.
    pub total_transactions: u64,
    /// Total number of addresses that ever appeared on chain.
    pub total_addresses: u64,
    /// Transactions in the last day.
    pub transactions_today: u64,
    /// Average block time in milliseconds.
    pub average_block_time: f64,
    /// Network utilization percentage.
    pub network_utilization: f64,
    /// Coin price, when the explorer reports one.
    pub coin_price: Option<String>,
    /// Market capitalization, when the explorer reports one.
    pub market_cap: Option<String>,
}

impl NetworkStats {
    /// Block time assumed when the explorer does not report one.
    pub const DEFAULT_BLOCK_TIME_MS: f64 = 5000.0;
}
