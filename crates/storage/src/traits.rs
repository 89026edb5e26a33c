use crate::StorageError;
use async_trait::async_trait;
use insight_protocol::Block;
use std::fmt::Debug;
use tracing::warn;

/// Provides an interface for persisting ingested blocks and querying their history.
///
/// Blocks are keyed by `(zone, number)`. Backends implement the fallible `upsert_block` and
/// `fetch_*` methods; readers use [`BlockStorage::recent_blocks`] and
/// [`BlockStorage::blocks_since`], which degrade to an empty result when the backend fails so
/// that a read path can fall through to its next source.
#[async_trait]
pub trait BlockStorage: Debug + Send + Sync {
    /// Inserts `block`, overwriting any stored block with the same `(zone, number)`.
    ///
    /// # Returns
    /// * `Ok(())` if the block was written.
    /// * `Err(StorageError)` if the backend rejected or could not receive the write.
    async fn upsert_block(&self, block: &Block) -> Result<(), StorageError>;

    /// Fetches up to `limit` blocks of `zone`, ordered by descending block number.
    async fn fetch_recent_blocks(
        &self,
        zone: &str,
        limit: usize,
    ) -> Result<Vec<Block>, StorageError>;

    /// Fetches all blocks of `zone` with a timestamp at or after `since` (unix seconds),
    /// ordered by ascending timestamp.
    async fn fetch_blocks_since(&self, zone: &str, since: u64) -> Result<Vec<Block>, StorageError>;

    /// Returns up to `limit` recent blocks of `zone`, newest first.
    ///
    /// Backend failures are logged and yield an empty list.
    async fn recent_blocks(&self, zone: &str, limit: usize) -> Vec<Block> {
        self.fetch_recent_blocks(zone, limit).await.unwrap_or_else(|err| {
            warn!(target: "storage", zone, limit, %err, "Failed to fetch recent blocks");
            Vec::new()
        })
    }

    /// Returns the blocks of `zone` produced at or after `since`, oldest first.
    ///
    /// Backend failures are logged and yield an empty list.
    async fn blocks_since(&self, zone: &str, since: u64) -> Vec<Block> {
        self.fetch_blocks_since(zone, since).await.unwrap_or_else(|err| {
            warn!(target: "storage", zone, since, %err, "Failed to fetch block range");
            Vec::new()
        })
    }
}
