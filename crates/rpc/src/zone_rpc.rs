//! Typed access to the `quai_` RPC namespace.

use crate::{RpcBlock, RpcClient, RpcError, RpcTransaction};
use alloy_primitives::U256;
use async_trait::async_trait;
use insight_protocol::{decode_hex, hex::encode_hex, hex::parse_u256};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fmt::Debug;
use tracing::warn;

/// Typed chain queries against a zone.
///
/// Failures of any kind are logged and reported as `None`: callers decide whether absence is
/// fatal for them.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ZoneRpc: Debug + Send + Sync {
    /// Returns the height of the latest block of `zone`.
    async fn latest_block_number(&self, zone: &str) -> Option<u64>;

    /// Returns the body of block `number` of `zone`, optionally with full transaction objects.
    async fn block_by_number(
        &self,
        zone: &str,
        number: u64,
        full_transactions: bool,
    ) -> Option<RpcBlock>;

    /// Returns the current gas price of `zone` in wei.
    async fn gas_price(&self, zone: &str) -> Option<u64>;

    /// Returns the latest balance of `address` in `zone` in wei.
    async fn balance(&self, zone: &str, address: &str) -> Option<U256>;

    /// Returns the transaction with hash `hash` in `zone`.
    async fn transaction_by_hash(&self, zone: &str, hash: &str) -> Option<RpcTransaction>;
}

impl RpcClient {
    /// Calls `method` and deserializes a non-null result, logging and swallowing failures.
    async fn call_opt<T: DeserializeOwned>(
        &self,
        zone: &str,
        method: &str,
        params: Vec<Value>,
    ) -> Option<T> {
        let result = match self.call(zone, method, params).await {
            Ok(Value::Null) => return None,
            Ok(result) => serde_json::from_value(result)
                .map_err(|e| RpcError::InvalidResponse(e.to_string())),
            Err(err) => Err(err),
        };

        result
            .inspect_err(|err| {
                warn!(target: "rpc", zone, method, kind = err.kind(), %err, "RPC request failed");
            })
            .ok()
    }
}

#[async_trait]
impl ZoneRpc for RpcClient {
    async fn latest_block_number(&self, zone: &str) -> Option<u64> {
        let result: String = self.call_opt(zone, "quai_blockNumber", vec![]).await?;
        Some(decode_hex(Some(&result)))
    }

    async fn block_by_number(
        &self,
        zone: &str,
        number: u64,
        full_transactions: bool,
    ) -> Option<RpcBlock> {
        let params = vec![json!(encode_hex(number)), json!(full_transactions)];
        self.call_opt(zone, "quai_getBlockByNumber", params).await
    }

    async fn gas_price(&self, zone: &str) -> Option<u64> {
        let result: String = self.call_opt(zone, "quai_gasPrice", vec![]).await?;
        Some(decode_hex(Some(&result)))
    }

    async fn balance(&self, zone: &str, address: &str) -> Option<U256> {
        let params = vec![json!(address), json!("latest")];
        let result: String = self.call_opt(zone, "quai_getBalance", params).await?;
        parse_u256(&result).ok()
    }

    async fn transaction_by_hash(&self, zone: &str, hash: &str) -> Option<RpcTransaction> {
        self.call_opt(zone, "quai_getTransactionByHash", vec![json!(hash)]).await
    }
}
