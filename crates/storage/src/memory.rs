//! In-process block storage.

use crate::{BlockStorage, StorageError};
use async_trait::async_trait;
use insight_protocol::Block;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Stores blocks in an ordered in-memory map keyed by `(zone, number)`.
#[derive(Debug, Default)]
pub struct MemoryBlockStore {
    blocks: RwLock<BTreeMap<(String, u64), Block>>,
}

impl MemoryBlockStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `blocks`. Later duplicates overwrite earlier ones.
    pub fn with_blocks(blocks: impl IntoIterator<Item = Block>) -> Self {
        let store = Self::new();
        {
            let mut map = store.blocks.write();
            for block in blocks {
                map.insert((block.zone.clone(), block.number), block);
            }
        }
        store
    }

    /// Returns the number of stored blocks across all zones.
    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    /// Returns `true` if no block is stored.
    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }

    /// Returns the stored block with the given key.
    pub fn get(&self, zone: &str, number: u64) -> Option<Block> {
        self.blocks.read().get(&(zone.to_string(), number)).cloned()
    }

    fn zone_blocks(&self, zone: &str) -> Vec<Block> {
        let start = (zone.to_string(), 0);
        let end = (zone.to_string(), u64::MAX);
        self.blocks.read().range(start..=end).map(|(_, b)| b.clone()).collect()
    }
}

#[async_trait]
impl BlockStorage for MemoryBlockStore {
    async fn upsert_block(&self, block: &Block) -> Result<(), StorageError> {
        self.blocks.write().insert((block.zone.clone(), block.number), block.clone());
        Ok(())
    }

    async fn fetch_recent_blocks(
        &self,
        zone: &str,
        limit: usize,
    ) -> Result<Vec<Block>, StorageError> {
        Ok(self.zone_blocks(zone).into_iter().rev().take(limit).collect())
    }

    async fn fetch_blocks_since(&self, zone: &str, since: u64) -> Result<Vec<Block>, StorageError> {
        let mut blocks: Vec<_> =
            self.zone_blocks(zone).into_iter().filter(|b| b.timestamp >= since).collect();
        blocks.sort_by_key(|b| (b.timestamp, b.number));
        Ok(blocks)
    }
}
