//! Raw RPC response shapes and their normalization into the canonical types.

use insight_protocol::{Block, Transaction, decode_hex_value, hex::parse_u256};
use serde::Deserialize;
use serde_json::Value;

/// A block body as returned by `quai_getBlockByNumber`.
///
/// Every field is optional: nodes omit fields, report quantities either as hex strings or as
/// numbers, and report `transactions` either as a list or as a count. [`RpcBlock::normalize`]
/// resolves all of these variants once.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlock {
    /// Block height.
    pub number: Option<Value>,
    /// Block hash.
    pub hash: Option<String>,
    /// Parent block hash.
    pub parent_hash: Option<String>,
    /// Block timestamp in unix seconds.
    pub timestamp: Option<Value>,
    /// Gas used by the block.
    pub gas_used: Option<Value>,
    /// Alternate name for the gas used by the block.
    pub gas: Option<Value>,
    /// Either the transaction list or the transaction count.
    pub transactions: Option<Value>,
    /// Block producer.
    pub miner: Option<String>,
}

impl RpcBlock {
    /// Number of transactions in the block.
    pub fn tx_count(&self) -> u32 {
        let count = match &self.transactions {
            Some(Value::Array(txs)) => txs.len() as u64,
            other => decode_hex_value(other.as_ref()),
        };
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Gas used by the block, preferring `gasUsed` over `gas`.
    pub fn gas_used(&self) -> u64 {
        match decode_hex_value(self.gas_used.as_ref()) {
            0 => decode_hex_value(self.gas.as_ref()),
            gas => gas,
        }
    }

    /// Normalizes this body into a [`Block`] of `zone`.
    ///
    /// `requested` is the height the body was fetched by and is used when the body carries no
    /// number. `now` is used when the body carries no timestamp. Missing hashes become
    /// [`Block::UNKNOWN_HASH`].
    pub fn normalize(self, zone: &str, requested: u64, now: u64) -> Block {
        let tx_count = self.tx_count();
        let gas_used = self.gas_used();
        let number = match decode_hex_value(self.number.as_ref()) {
            0 => requested,
            number => number,
        };
        let timestamp = match decode_hex_value(self.timestamp.as_ref()) {
            0 => now,
            timestamp => timestamp,
        };

        Block {
            zone: zone.to_string(),
            number,
            hash: self.hash.unwrap_or_else(|| Block::UNKNOWN_HASH.to_string()),
            parent_hash: self.parent_hash.unwrap_or_else(|| Block::UNKNOWN_HASH.to_string()),
            timestamp,
            tx_count,
            gas_used,
            miner: self.miner,
        }
    }
}

/// A transaction as returned by `quai_getTransactionByHash`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    /// Transaction hash.
    pub hash: Option<String>,
    /// Sender address.
    pub from: Option<String>,
    /// Recipient address.
    pub to: Option<String>,
    /// Transferred value as a hex quantity.
    pub value: Option<String>,
    /// Gas limit of the transaction.
    pub gas: Option<String>,
}

impl RpcTransaction {
    /// Normalizes this response into a [`Transaction`] observed in `zone`.
    ///
    /// RPC transactions carry no timestamp, so the result has none.
    pub fn normalize(self, zone: &str) -> Transaction {
        Transaction {
            hash: self.hash.unwrap_or_default(),
            from: self.from,
            to: self.to,
            value: self.value.and_then(|v| parse_u256(&v).ok()).unwrap_or_default(),
            timestamp: None,
            zone: Some(zone.to_string()),
            gas_used: None,
            status: None,
            tx_type: None,
        }
    }
}
