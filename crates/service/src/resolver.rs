//! Read-through resolution of chain data across cache, store, explorer and RPC.

use crate::{Metrics, TtlCache, unix_now};
use alloy_primitives::U256;
use futures::future::join_all;
use insight_protocol::{Block, NetworkStats, Transaction};
use insight_rpc::{ExplorerClient, ZoneRpc};
use insight_storage::BlockStorage;
use std::{
    collections::BTreeMap,
    future::Future,
    num::NonZeroUsize,
    sync::Arc,
    time::Duration,
};
use tracing::{debug, warn};

/// Time-to-live settings of a [`TieredResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Lifetime of cached block lists.
    pub block_ttl: Duration,
    /// Lifetime of cached single-value RPC reads and explorer lists.
    pub rpc_ttl: Duration,
    /// Lifetime of cached network statistics.
    pub stats_ttl: Duration,
    /// Maximum number of cache entries. Unbounded when `None`.
    pub cache_capacity: Option<NonZeroUsize>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            block_ttl: Duration::from_secs(5),
            rpc_ttl: Duration::from_secs(5),
            stats_ttl: Duration::from_secs(10),
            cache_capacity: None,
        }
    }
}

/// The tier that served a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Served from the in-process cache.
    Cache,
    /// Served entirely from the persistent store.
    Store,
    /// At least part of the result was fetched over RPC.
    Rpc,
    /// Served by the block explorer.
    Explorer,
    /// No tier produced data.
    Empty,
}

impl Source {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Store => "store",
            Self::Rpc => "rpc",
            Self::Explorer => "explorer",
            Self::Empty => "empty",
        }
    }
}

/// A value together with the tier it was served from.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    /// The resolved value.
    pub value: T,
    /// The tier that produced it.
    pub source: Source,
}

impl<T> Resolved<T> {
    const fn new(value: T, source: Source) -> Self {
        Self { value, source }
    }
}

/// Cache key of a resolved read: the zone, the method and its serialized parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    zone: String,
    method: &'static str,
    params: String,
}

impl CacheKey {
    fn new(zone: &str, method: &'static str, params: impl ToString) -> Self {
        Self { zone: zone.to_string(), method, params: params.to_string() }
    }
}

#[derive(Debug, Clone)]
enum Cached {
    Blocks(Vec<Block>),
    Transactions(Vec<Transaction>),
    Transaction(Transaction),
    Stats(NetworkStats),
    GasPrice(u64),
    Balance(U256),
}

trait Cacheable: Clone + Sized {
    fn into_cached(self) -> Cached;
    fn from_cached(cached: Cached) -> Option<Self>;
}

macro_rules! cacheable {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Cacheable for $ty {
                fn into_cached(self) -> Cached {
                    Cached::$variant(self)
                }

                fn from_cached(cached: Cached) -> Option<Self> {
                    match cached {
                        Cached::$variant(value) => Some(value),
                        _ => None,
                    }
                }
            }
        )*
    };
}

cacheable! {
    Vec<Block> => Blocks,
    Vec<Transaction> => Transactions,
    Transaction => Transaction,
    NetworkStats => Stats,
    u64 => GasPrice,
    U256 => Balance,
}

/// Key used for explorer reads that span every zone.
const ALL_ZONES: &str = "all";

/// Answers read requests by consulting progressively slower sources.
///
/// Block lists are resolved through the cache, then the persistent store, then by fanning out
/// `quai_getBlockByNumber` requests for the heights the store did not have. Other reads go to
/// the cache and then a single remote source. Successful non-empty results are cached; failures
/// and empty results are not, so the next read retries the remote source.
#[derive(Debug)]
pub struct TieredResolver<R> {
    rpc: Arc<R>,
    store: Option<Arc<dyn BlockStorage>>,
    explorer: Option<ExplorerClient>,
    cache: TtlCache<CacheKey, Cached>,
    config: ResolverConfig,
}

impl<R: ZoneRpc> TieredResolver<R> {
    /// Creates a resolver backed only by `rpc`.
    pub fn new(rpc: Arc<R>, config: ResolverConfig) -> Self {
        let cache = config.cache_capacity.map_or_else(TtlCache::new, TtlCache::with_capacity);
        Self { rpc, store: None, explorer: None, cache, config }
    }

    /// Adds a persistent store tier.
    pub fn with_store(mut self, store: Arc<dyn BlockStorage>) -> Self {
        self.store = Some(store);
        self
    }

    /// Adds a block explorer source.
    pub fn with_explorer(mut self, explorer: ExplorerClient) -> Self {
        self.explorer = Some(explorer);
        self
    }

    /// Returns the resolver configuration.
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Returns up to `limit` of the most recent blocks of `zone`, newest first.
    ///
    /// A cached result is returned as is. Otherwise the store is consulted; if it holds fewer
    /// than `limit` blocks, the latest height is fetched once and the missing heights among the
    /// top `limit` are fetched concurrently. Heights that fail are left out. The result has no
    /// duplicate heights.
    pub async fn recent_blocks(&self, zone: &str, limit: usize) -> Resolved<Vec<Block>> {
        const METHOD: &str = "recent_blocks";

        if limit == 0 {
            return Resolved::new(Vec::new(), Source::Empty);
        }
        let key = CacheKey::new(zone, METHOD, limit);
        if let Some(blocks) = self.lookup::<Vec<Block>>(&key) {
            Metrics::record_read(METHOD, Source::Cache.as_str());
            return Resolved::new(blocks, Source::Cache);
        }

        let mut stored = match &self.store {
            Some(store) => store.recent_blocks(zone, limit).await,
            None => Vec::new(),
        };
        stored.truncate(limit);

        let (blocks, source) = if stored.len() == limit {
            (stored, Source::Store)
        } else {
            let fetched = self.fetch_missing_blocks(zone, limit, &stored).await;
            let source = match (stored.is_empty(), fetched.is_empty()) {
                (true, true) => Source::Empty,
                (false, true) => Source::Store,
                (_, false) => Source::Rpc,
            };
            (merge_blocks(stored, fetched, limit), source)
        };

        if !blocks.is_empty() {
            self.cache.set(key, blocks.clone().into_cached(), self.config.block_ttl);
        }
        debug!(
            target: "resolver",
            zone,
            limit,
            served = blocks.len(),
            ?source,
            "Resolved recent blocks"
        );
        Metrics::record_read(METHOD, source.as_str());
        Resolved::new(blocks, source)
    }

    /// Fetches the heights among the top `limit` that `stored` lacks.
    async fn fetch_missing_blocks(&self, zone: &str, limit: usize, stored: &[Block]) -> Vec<Block> {
        let Some(latest) = self.rpc.latest_block_number(zone).await.filter(|n| *n > 0) else {
            warn!(target: "resolver", zone, "Latest block number unavailable");
            return Vec::new();
        };

        let now = unix_now();
        let heights = (0..limit as u64)
            .map_while(|offset| latest.checked_sub(offset))
            .filter(|height| !stored.iter().any(|b| b.number == *height));
        let requests = heights.map(|height| async move {
            let body = self.rpc.block_by_number(zone, height, false).await?;
            Some(body.normalize(zone, height, now))
        });

        join_all(requests).await.into_iter().flatten().collect()
    }

    /// Returns the stored blocks of `zone` produced in the last `hours` hours, oldest first.
    pub async fn historical_blocks(&self, zone: &str, hours: u64) -> Vec<Block> {
        let Some(store) = &self.store else {
            return Vec::new();
        };
        let since = unix_now().saturating_sub(hours.saturating_mul(3600));
        store.blocks_since(zone, since).await
    }

    /// Returns the current gas price of `zone` in wei.
    pub async fn gas_price(&self, zone: &str) -> Option<u64> {
        let key = CacheKey::new(zone, "gas_price", "");
        self.read_through(key, self.config.rpc_ttl, Source::Rpc, self.rpc.gas_price(zone)).await
    }

    /// Returns the balance of `address` in `zone` in wei. Unknown balances read as zero.
    pub async fn balance(&self, zone: &str, address: &str) -> U256 {
        let key = CacheKey::new(zone, "balance", address);
        self.read_through(key, self.config.rpc_ttl, Source::Rpc, self.rpc.balance(zone, address))
            .await
            .unwrap_or_default()
    }

    /// Returns the transaction with hash `hash` in `zone`.
    pub async fn transaction(&self, zone: &str, hash: &str) -> Option<Transaction> {
        let key = CacheKey::new(zone, "transaction", hash);
        let fetch = async {
            let tx = self.rpc.transaction_by_hash(zone, hash).await?;
            Some(tx.normalize(zone))
        };
        self.read_through(key, self.config.rpc_ttl, Source::Rpc, fetch).await
    }

    /// Returns network wide statistics from the block explorer.
    pub async fn network_stats(&self) -> Option<NetworkStats> {
        let explorer = self.explorer.as_ref()?;
        let key = CacheKey::new(ALL_ZONES, "network_stats", "");
        let fetch = async {
            explorer
                .network_stats()
                .await
                .inspect_err(|err| warn!(target: "resolver", %err, "Failed to fetch network stats"))
                .ok()
        };
        self.read_through(key, self.config.stats_ttl, Source::Explorer, fetch).await
    }

    /// Returns up to `limit` recent blocks as listed by the block explorer.
    pub async fn explorer_blocks(&self, zone: Option<&str>, limit: usize) -> Vec<Block> {
        let Some(explorer) = &self.explorer else {
            return Vec::new();
        };
        let key = CacheKey::new(zone.unwrap_or(ALL_ZONES), "explorer_blocks", limit);
        let fetch = async {
            explorer
                .recent_blocks(zone, limit)
                .await
                .inspect_err(|err| {
                    warn!(target: "resolver", %err, "Failed to fetch explorer blocks");
                })
                .ok()
        };
        self.read_through(key, self.config.block_ttl, Source::Explorer, fetch)
            .await
            .unwrap_or_default()
    }

    /// Returns up to `limit` recently validated transactions as listed by the block explorer.
    pub async fn recent_transactions(&self, zone: Option<&str>, limit: usize) -> Vec<Transaction> {
        let Some(explorer) = &self.explorer else {
            return Vec::new();
        };
        let key = CacheKey::new(zone.unwrap_or(ALL_ZONES), "recent_transactions", limit);
        let fetch = async {
            explorer
                .recent_transactions(zone, limit)
                .await
                .inspect_err(|err| warn!(target: "resolver", %err, "Failed to fetch transactions"))
                .ok()
        };
        self.read_through(key, self.config.rpc_ttl, Source::Explorer, fetch)
            .await
            .unwrap_or_default()
    }

    /// Returns up to `limit` transactions touching `address`. Not cached.
    pub async fn address_transactions(&self, address: &str, limit: usize) -> Vec<Transaction> {
        let Some(explorer) = &self.explorer else {
            return Vec::new();
        };
        explorer.address_transactions(address, limit).await.unwrap_or_else(|err| {
            warn!(target: "resolver", address, %err, "Failed to fetch address transactions");
            Vec::new()
        })
    }

    fn lookup<T: Cacheable>(&self, key: &CacheKey) -> Option<T> {
        let hit = self.cache.get(key).and_then(T::from_cached);
        Metrics::record_cache_lookup(key.method, hit.is_some());
        hit
    }

    /// Returns the cached value for `key`, or awaits `fetch` and caches what it yields.
    async fn read_through<T, F>(
        &self,
        key: CacheKey,
        ttl: Duration,
        origin: Source,
        fetch: F,
    ) -> Option<T>
    where
        T: Cacheable,
        F: Future<Output = Option<T>>,
    {
        if let Some(value) = self.lookup::<T>(&key) {
            Metrics::record_read(key.method, Source::Cache.as_str());
            return Some(value);
        }
        let Some(value) = fetch.await else {
            Metrics::record_read(key.method, Source::Empty.as_str());
            return None;
        };
        Metrics::record_read(key.method, origin.as_str());
        self.cache.set(key, value.clone().into_cached(), ttl);
        Some(value)
    }
}

/// Unions two block lists, keeping the first occurrence of each height, newest first.
fn merge_blocks(stored: Vec<Block>, fetched: Vec<Block>, limit: usize) -> Vec<Block> {
    let mut by_height = BTreeMap::new();
    for block in stored.into_iter().chain(fetched) {
        by_height.entry(block.number).or_insert(block);
    }
    by_height.into_values().rev().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use insight_rpc::{MockZoneRpc, RpcBlock, RpcTransaction};
    use insight_storage::{MemoryBlockStore, StorageError};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ZONE: &str = "cyprus-1";

    fn block(number: u64) -> Block {
        Block {
            zone: ZONE.into(),
            number,
            hash: format!("0x{number:x}"),
            parent_hash: format!("0x{:x}", number - 1),
            timestamp: 1_700_000_000 + number,
            tx_count: 1,
            gas_used: 21_000,
            miner: None,
        }
    }

    fn body(number: u64) -> RpcBlock {
        RpcBlock {
            number: Some(json!(format!("{number:#x}"))),
            hash: Some(format!("0x{number:x}")),
            parent_hash: Some(format!("0x{:x}", number - 1)),
            timestamp: Some(json!(1_700_000_000 + number)),
            gas_used: Some(json!("0x5208")),
            transactions: Some(json!(["0xtx"])),
            ..Default::default()
        }
    }

    fn numbers(blocks: &[Block]) -> Vec<u64> {
        blocks.iter().map(|b| b.number).collect()
    }

    /// Counts reads delegated to an in-memory store.
    #[derive(Debug)]
    struct CountingStore {
        inner: MemoryBlockStore,
        reads: AtomicUsize,
    }

    impl CountingStore {
        fn with_range(range: std::ops::RangeInclusive<u64>) -> Arc<Self> {
            let inner = MemoryBlockStore::with_blocks(range.map(block));
            Arc::new(Self { inner, reads: AtomicUsize::new(0) })
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BlockStorage for CountingStore {
        async fn upsert_block(&self, block: &Block) -> Result<(), StorageError> {
            self.inner.upsert_block(block).await
        }

        async fn fetch_recent_blocks(
            &self,
            zone: &str,
            limit: usize,
        ) -> Result<Vec<Block>, StorageError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_recent_blocks(zone, limit).await
        }

        async fn fetch_blocks_since(
            &self,
            zone: &str,
            since: u64,
        ) -> Result<Vec<Block>, StorageError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_blocks_since(zone, since).await
        }
    }

    #[derive(Debug)]
    struct BrokenStore;

    #[async_trait]
    impl BlockStorage for BrokenStore {
        async fn upsert_block(&self, _: &Block) -> Result<(), StorageError> {
            Err(StorageError::ConnectionFailed("down".into()))
        }

        async fn fetch_recent_blocks(&self, _: &str, _: usize) -> Result<Vec<Block>, StorageError> {
            Err(StorageError::ConnectionFailed("down".into()))
        }

        async fn fetch_blocks_since(&self, _: &str, _: u64) -> Result<Vec<Block>, StorageError> {
            Err(StorageError::ConnectionFailed("down".into()))
        }
    }

    fn resolver(rpc: MockZoneRpc) -> TieredResolver<MockZoneRpc> {
        TieredResolver::new(Arc::new(rpc), ResolverConfig::default())
    }

    #[tokio::test]
    async fn test_store_serves_when_it_has_enough_blocks() {
        let store = CountingStore::with_range(91..=100);
        let mut rpc = MockZoneRpc::new();
        rpc.expect_latest_block_number().never();
        rpc.expect_block_by_number().never();
        let resolver = resolver(rpc).with_store(store.clone());

        let resolved = resolver.recent_blocks(ZONE, 5).await;

        assert_eq!(resolved.source, Source::Store);
        assert_eq!(numbers(&resolved.value), vec![100, 99, 98, 97, 96]);
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_store_and_rpc() {
        let store = CountingStore::with_range(91..=100);
        let mut rpc = MockZoneRpc::new();
        rpc.expect_latest_block_number().never();
        let resolver = resolver(rpc).with_store(store.clone());

        let first = resolver.recent_blocks(ZONE, 5).await;
        let second = resolver.recent_blocks(ZONE, 5).await;

        assert_eq!(second.source, Source::Cache);
        assert_eq!(second.value, first.value);
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test]
    async fn test_cache_is_keyed_by_zone_and_limit() {
        let store = CountingStore::with_range(91..=100);
        let mut rpc = MockZoneRpc::new();
        rpc.expect_latest_block_number().returning(|_| None);
        let resolver = resolver(rpc).with_store(store.clone());

        resolver.recent_blocks(ZONE, 5).await;
        assert_eq!(resolver.recent_blocks(ZONE, 3).await.source, Source::Store);
        assert_eq!(resolver.recent_blocks("paxos-1", 5).await.source, Source::Empty);
        assert_eq!(store.reads(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_blocks_expire() {
        let store = CountingStore::with_range(91..=100);
        let resolver = resolver(MockZoneRpc::new()).with_store(store.clone());

        resolver.recent_blocks(ZONE, 5).await;
        tokio::time::advance(Duration::from_secs(5)).await;
        let resolved = resolver.recent_blocks(ZONE, 5).await;

        assert_eq!(resolved.source, Source::Store);
        assert_eq!(store.reads(), 2);
    }

    #[tokio::test]
    async fn test_rpc_fills_heights_missing_from_store() {
        let store = CountingStore::with_range(99..=100);
        let mut rpc = MockZoneRpc::new();
        rpc.expect_latest_block_number().times(1).returning(|_| Some(100));
        rpc.expect_block_by_number()
            .withf(|zone, number, full| zone == ZONE && (96..=98).contains(number) && !*full)
            .times(3)
            .returning(|_, n, _| Some(body(n)));
        let resolver = resolver(rpc).with_store(store);

        let resolved = resolver.recent_blocks(ZONE, 5).await;

        assert_eq!(resolved.source, Source::Rpc);
        assert_eq!(numbers(&resolved.value), vec![100, 99, 98, 97, 96]);
        assert_eq!(resolved.value[2], block(98));
    }

    #[tokio::test]
    async fn test_failed_heights_are_omitted() {
        let mut rpc = MockZoneRpc::new();
        rpc.expect_latest_block_number().times(1).returning(|_| Some(100));
        rpc.expect_block_by_number()
            .times(5)
            .returning(|_, n, _| if n == 97 { None } else { Some(body(n)) });

        let resolved = resolver(rpc).recent_blocks(ZONE, 5).await;

        assert_eq!(resolved.source, Source::Rpc);
        assert_eq!(numbers(&resolved.value), vec![100, 99, 98, 96]);
    }

    #[tokio::test]
    async fn test_fan_out_stops_at_genesis() {
        let mut rpc = MockZoneRpc::new();
        rpc.expect_latest_block_number().returning(|_| Some(2));
        rpc.expect_block_by_number().times(3).returning(|_, n, _| {
            Some(RpcBlock { number: Some(json!(n)), ..Default::default() })
        });

        let resolved = resolver(rpc).recent_blocks(ZONE, 10).await;
        assert_eq!(numbers(&resolved.value), vec![2, 1, 0]);
        assert_eq!(resolved.value[0].hash, Block::UNKNOWN_HASH);
    }

    #[tokio::test]
    async fn test_partial_store_rows_survive_rpc_outage() {
        let store = CountingStore::with_range(99..=100);
        let mut rpc = MockZoneRpc::new();
        rpc.expect_latest_block_number().times(1).returning(|_| None);
        rpc.expect_block_by_number().never();

        let resolved = resolver(rpc).with_store(store).recent_blocks(ZONE, 5).await;

        assert_eq!(resolved.source, Source::Store);
        assert_eq!(numbers(&resolved.value), vec![100, 99]);
    }

    #[tokio::test]
    async fn test_zero_head_is_unavailable() {
        let mut rpc = MockZoneRpc::new();
        rpc.expect_latest_block_number().times(2).returning(|_| Some(0));
        rpc.expect_block_by_number().never();
        let resolver = resolver(rpc);

        for _ in 0..2 {
            let resolved = resolver.recent_blocks(ZONE, 5).await;
            assert_eq!(resolved, Resolved::new(Vec::new(), Source::Empty));
        }
    }

    #[tokio::test]
    async fn test_zero_head_keeps_partial_store_rows() {
        let store = CountingStore::with_range(99..=100);
        let mut rpc = MockZoneRpc::new();
        rpc.expect_latest_block_number().times(1).returning(|_| Some(0));
        rpc.expect_block_by_number().never();

        let resolved = resolver(rpc).with_store(store).recent_blocks(ZONE, 5).await;

        assert_eq!(resolved.source, Source::Store);
        assert_eq!(numbers(&resolved.value), vec![100, 99]);
    }

    #[tokio::test]
    async fn test_all_tiers_empty_is_not_cached() {
        let mut rpc = MockZoneRpc::new();
        rpc.expect_latest_block_number().times(2).returning(|_| None);
        let resolver = resolver(rpc).with_store(Arc::new(BrokenStore));

        for _ in 0..2 {
            let resolved = resolver.recent_blocks(ZONE, 5).await;
            assert_eq!(resolved, Resolved::new(Vec::new(), Source::Empty));
        }
    }

    #[tokio::test]
    async fn test_zero_limit_touches_nothing() {
        let store = CountingStore::with_range(1..=3);
        let resolver = resolver(MockZoneRpc::new()).with_store(store.clone());

        assert!(resolver.recent_blocks(ZONE, 0).await.value.is_empty());
        assert_eq!(store.reads(), 0);
    }

    #[test]
    fn test_merge_blocks_prefers_first_occurrence() {
        let mut fetched = block(100);
        fetched.tx_count = 99;
        let merged = merge_blocks(vec![block(100), block(98)], vec![fetched, block(99)], 2);

        assert_eq!(numbers(&merged), vec![100, 99]);
        assert_eq!(merged[0].tx_count, 1);
    }

    #[tokio::test]
    async fn test_historical_blocks_reads_store_window() {
        let now = unix_now();
        let mut recent = block(10);
        recent.timestamp = now - 60;
        let mut old = block(9);
        old.timestamp = now - 7200;
        let store = Arc::new(MemoryBlockStore::with_blocks([old, recent.clone()]));
        let resolver = resolver(MockZoneRpc::new()).with_store(store);

        assert_eq!(resolver.historical_blocks(ZONE, 1).await, vec![recent]);
        assert_eq!(resolver.historical_blocks(ZONE, 3).await.len(), 2);
    }

    #[tokio::test]
    async fn test_historical_blocks_without_store() {
        assert!(resolver(MockZoneRpc::new()).historical_blocks(ZONE, 24).await.is_empty());
    }

    #[tokio::test]
    async fn test_gas_price_is_cached() {
        let mut rpc = MockZoneRpc::new();
        rpc.expect_gas_price().times(1).returning(|_| Some(1_000_000_000));
        let resolver = resolver(rpc);

        assert_eq!(resolver.gas_price(ZONE).await, Some(1_000_000_000));
        assert_eq!(resolver.gas_price(ZONE).await, Some(1_000_000_000));
    }

    #[tokio::test]
    async fn test_missing_values_are_retried() {
        let mut rpc = MockZoneRpc::new();
        rpc.expect_gas_price().times(2).returning(|_| None);
        rpc.expect_balance().times(2).returning(|_, _| None);
        let resolver = resolver(rpc);

        for _ in 0..2 {
            assert_eq!(resolver.gas_price(ZONE).await, None);
            assert_eq!(resolver.balance(ZONE, "0xabc").await, U256::ZERO);
        }
    }

    #[tokio::test]
    async fn test_balance_is_cached_per_address() {
        let mut rpc = MockZoneRpc::new();
        rpc.expect_balance()
            .times(2)
            .returning(|_, address| Some(U256::from(address.len())));
        let resolver = resolver(rpc);

        assert_eq!(resolver.balance(ZONE, "0xab").await, U256::from(4));
        assert_eq!(resolver.balance(ZONE, "0xab").await, U256::from(4));
        assert_eq!(resolver.balance(ZONE, "0xabcd").await, U256::from(6));
    }

    #[tokio::test]
    async fn test_transaction_is_normalized() {
        let mut rpc = MockZoneRpc::new();
        rpc.expect_transaction_by_hash().times(1).returning(|_, hash| {
            Some(RpcTransaction {
                hash: Some(hash.to_string()),
                value: Some("0x10".into()),
                ..Default::default()
            })
        });
        let resolver = resolver(rpc);

        let tx = resolver.transaction(ZONE, "0xfeed").await.unwrap();
        assert_eq!(tx.hash, "0xfeed");
        assert_eq!(tx.value, U256::from(16));
        assert_eq!(tx.zone.as_deref(), Some(ZONE));
        assert_eq!(resolver.transaction(ZONE, "0xfeed").await, Some(tx));
    }

    #[tokio::test]
    async fn test_explorer_reads_without_explorer() {
        let resolver = resolver(MockZoneRpc::new());

        assert_eq!(resolver.network_stats().await, None);
        assert!(resolver.explorer_blocks(None, 10).await.is_empty());
        assert!(resolver.recent_transactions(Some(ZONE), 10).await.is_empty());
        assert!(resolver.address_transactions("0xabc", 10).await.is_empty());
    }
}
