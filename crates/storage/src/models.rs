//! Row model of the `blocks` table.
//!
//! The table is keyed by `(zone, block_number)`. Timestamps are stored as instants rather than
//! unix seconds so the table can be queried by time range directly.

use chrono::{DateTime, Utc};
use insight_protocol::Block;
use serde::{Deserialize, Serialize};

/// A row of the `blocks` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRow {
    /// Block height within the zone.
    pub block_number: u64,
    /// Block hash.
    pub hash: String,
    /// Parent block hash.
    pub parent_hash: String,
    /// Block production time.
    pub timestamp: DateTime<Utc>,
    /// Number of transactions.
    pub tx_count: u32,
    /// Gas used.
    pub gas_used: u64,
    /// Zone identifier.
    pub zone: String,
}

/// Converts unix seconds into an instant, clamping unrepresentable values to the epoch.
pub(crate) fn instant(unix: u64) -> DateTime<Utc> {
    i64::try_from(unix)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

impl From<&Block> for BlockRow {
    fn from(block: &Block) -> Self {
        Self {
            block_number: block.number,
            hash: block.hash.clone(),
            parent_hash: block.parent_hash.clone(),
            timestamp: instant(block.timestamp),
            tx_count: block.tx_count,
            gas_used: block.gas_used,
            zone: block.zone.clone(),
        }
    }
}

impl From<BlockRow> for Block {
    fn from(row: BlockRow) -> Self {
        Self {
            zone: row.zone,
            number: row.block_number,
            hash: row.hash,
            parent_hash: row.parent_hash,
            timestamp: u64::try_from(row.timestamp.timestamp()).unwrap_or_default(),
            tx_count: row.tx_count,
            gas_used: row.gas_used,
            miner: None,
        }
    }
}
