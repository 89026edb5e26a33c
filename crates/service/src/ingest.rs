//! Polls a zone for its latest block and persists it.

use crate::{Metrics, unix_now};
use insight_protocol::{Block, DEFAULT_ZONE};
use insight_rpc::ZoneRpc;
use insight_storage::BlockStorage;
use std::{
    sync::Arc,
    time::Duration,
};
use tokio::{
    sync::Mutex,
    time::{MissedTickBehavior, interval},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Configuration of a [`BlockIngestor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// Zone to ingest.
    pub zone: String,
    /// Delay between the starts of two consecutive cycles in continuous mode.
    pub poll_interval: Duration,
}

impl IngestConfig {
    /// Default polling interval.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { zone: DEFAULT_ZONE.to_string(), poll_interval: Self::DEFAULT_POLL_INTERVAL }
    }
}

/// Result of a single ingestion cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The zone did not report a usable latest block number.
    HeadUnavailable,
    /// The body of the latest block could not be fetched.
    BodyUnavailable(u64),
    /// The block was written to the store.
    Persisted(Block),
    /// No store is configured; the block was only reported.
    DryRun(Block),
    /// The store rejected or could not receive the block.
    WriteFailed(Block),
}

impl CycleOutcome {
    /// Returns the block fetched during the cycle, if any.
    pub const fn block(&self) -> Option<&Block> {
        match self {
            Self::Persisted(block) | Self::DryRun(block) | Self::WriteFailed(block) => Some(block),
            Self::HeadUnavailable | Self::BodyUnavailable(_) => None,
        }
    }

    /// Returns the height written to the store, if the cycle persisted a block.
    pub const fn persisted_height(&self) -> Option<u64> {
        match self {
            Self::Persisted(block) => Some(block.number),
            _ => None,
        }
    }

    const fn label(&self) -> &'static str {
        match self {
            Self::HeadUnavailable => "head_unavailable",
            Self::BodyUnavailable(_) => "body_unavailable",
            Self::Persisted(_) => "persisted",
            Self::DryRun(_) => "dry_run",
            Self::WriteFailed(_) => "write_failed",
        }
    }
}

/// Fetches the latest block of a zone and upserts it into the store, once or on an interval.
///
/// Without a store the ingestor runs in dry-run mode: blocks are fetched and reported but never
/// written. Cycles never overlap, whether they are driven by [`BlockIngestor::run`] or by
/// concurrent calls to [`BlockIngestor::run_once`]. A cycle that fails leaves the loop running.
#[derive(Debug)]
pub struct BlockIngestor<R> {
    config: IngestConfig,
    rpc: Arc<R>,
    store: Option<Arc<dyn BlockStorage>>,
    cycle: Mutex<()>,
    cancellation: CancellationToken,
}

impl<R: ZoneRpc> BlockIngestor<R> {
    /// Creates a new ingestor. Passing no store selects dry-run mode.
    pub fn new(
        config: IngestConfig,
        rpc: Arc<R>,
        store: Option<Arc<dyn BlockStorage>>,
        cancellation: CancellationToken,
    ) -> Self {
        Self { config, rpc, store, cycle: Mutex::new(()), cancellation }
    }

    /// Returns the ingestor configuration.
    pub const fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Returns `true` if blocks are reported but not persisted.
    pub const fn is_dry_run(&self) -> bool {
        self.store.is_none()
    }

    /// Runs a single ingestion cycle.
    pub async fn run_once(&self) -> CycleOutcome {
        let _cycle = self.cycle.lock().await;
        let zone = self.config.zone.as_str();

        let outcome = self.ingest_latest(zone).await;
        report(zone, &outcome);
        Metrics::record_cycle(zone, outcome.label(), outcome.persisted_height());
        outcome
    }

    async fn ingest_latest(&self, zone: &str) -> CycleOutcome {
        let Some(latest) = self.rpc.latest_block_number(zone).await.filter(|n| *n > 0) else {
            return CycleOutcome::HeadUnavailable;
        };
        let Some(body) = self.rpc.block_by_number(zone, latest, true).await else {
            return CycleOutcome::BodyUnavailable(latest);
        };
        let block = body.normalize(zone, latest, unix_now());

        let Some(store) = &self.store else {
            return CycleOutcome::DryRun(block);
        };
        match store.upsert_block(&block).await {
            Ok(()) => CycleOutcome::Persisted(block),
            Err(err) => {
                error!(target: "ingest", zone, number = block.number, %err, "Failed to save block");
                CycleOutcome::WriteFailed(block)
            }
        }
    }

    /// Runs cycles every poll interval, starting immediately, until cancelled.
    ///
    /// Cancellation is observed between cycles; an in-flight cycle completes first. Ticks missed
    /// while a cycle overruns the interval are skipped.
    pub async fn run(&self) {
        info!(
            target: "ingest",
            zone = %self.config.zone,
            interval = ?self.config.poll_interval,
            dry_run = self.is_dry_run(),
            "Starting continuous ingestion"
        );

        let mut ticker = interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => {
                    info!(target: "ingest", zone = %self.config.zone, "Ingestion stopped");
                    return;
                }
                _ = ticker.tick() => {
                    self.run_once().await;
                }
            }
        }
    }
}

fn report(zone: &str, outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::HeadUnavailable => {
            warn!(target: "ingest", zone, "Failed to fetch latest block number");
        }
        CycleOutcome::BodyUnavailable(number) => {
            warn!(target: "ingest", zone, number, "Failed to fetch block data");
        }
        CycleOutcome::Persisted(block) => {
            info!(
                target: "ingest",
                zone,
                number = block.number,
                transactions = block.tx_count,
                gas = %format_gas(block.gas_used),
                hash = %short_hash(&block.hash),
                "Block saved"
            );
        }
        CycleOutcome::DryRun(block) => {
            info!(
                target: "ingest",
                zone,
                number = block.number,
                transactions = block.tx_count,
                gas = %format_gas(block.gas_used),
                hash = %short_hash(&block.hash),
                "Store not configured, block not saved"
            );
        }
        CycleOutcome::WriteFailed(_) => {}
    }
}

/// Gas in millions with two decimals, e.g. `12.35M`.
fn format_gas(gas: u64) -> String {
    format!("{:.2}M", gas as f64 / 1e6)
}

fn short_hash(hash: &str) -> String {
    match hash.get(..18) {
        Some(prefix) if prefix.len() < hash.len() => format!("{prefix}..."),
        _ => hash.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use alloy_primitives::U256;
    use insight_rpc::{MockZoneRpc, RpcBlock, RpcTransaction};
    use insight_storage::{MemoryBlockStore, StorageError};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ZONE: &str = "cyprus-1";

    fn body(number: u64, txs: usize) -> RpcBlock {
        RpcBlock {
            number: Some(json!(format!("{number:#x}"))),
            hash: Some(format!("0x{number:064x}")),
            parent_hash: Some(format!("0x{:064x}", number - 1)),
            timestamp: Some(json!("0x6553f100")),
            gas_used: Some(json!("0x1e8480")),
            transactions: Some(json!(vec!["0xtx"; txs])),
            ..Default::default()
        }
    }

    fn rpc_at(head: u64, txs: usize) -> MockZoneRpc {
        let mut rpc = MockZoneRpc::new();
        rpc.expect_latest_block_number().returning(move |_| Some(head));
        rpc.expect_block_by_number()
            .withf(move |zone, number, full| zone == ZONE && *number == head && *full)
            .returning(move |_, n, _| Some(body(n, txs)));
        rpc
    }

    fn ingestor(
        rpc: MockZoneRpc,
        store: Option<Arc<dyn BlockStorage>>,
    ) -> BlockIngestor<MockZoneRpc> {
        BlockIngestor::new(IngestConfig::default(), Arc::new(rpc), store, CancellationToken::new())
    }

    #[derive(Debug)]
    struct RejectingStore;

    #[async_trait]
    impl BlockStorage for RejectingStore {
        async fn upsert_block(&self, _: &Block) -> Result<(), StorageError> {
            Err(StorageError::ConnectionFailed("refused".into()))
        }

        async fn fetch_recent_blocks(&self, _: &str, _: usize) -> Result<Vec<Block>, StorageError> {
            Ok(vec![])
        }

        async fn fetch_blocks_since(&self, _: &str, _: u64) -> Result<Vec<Block>, StorageError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_persists_latest_block() {
        let store = Arc::new(MemoryBlockStore::new());
        let ingestor = ingestor(rpc_at(100, 3), Some(store.clone()));

        let outcome = ingestor.run_once().await;

        assert!(matches!(outcome, CycleOutcome::Persisted(_)));
        let stored = store.get(ZONE, 100).unwrap();
        assert_eq!(stored.tx_count, 3);
        assert_eq!(stored.gas_used, 2_000_000);
        assert_eq!(stored.timestamp, 0x6553f100);
        assert_eq!(stored.hash, format!("0x{:064x}", 100));
    }

    #[tokio::test]
    async fn test_reingesting_same_height_overwrites() {
        let store = Arc::new(MemoryBlockStore::new());
        ingestor(rpc_at(100, 3), Some(store.clone())).run_once().await;
        ingestor(rpc_at(100, 7), Some(store.clone())).run_once().await;

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(ZONE, 100).unwrap().tx_count, 7);
    }

    #[rstest::rstest]
    #[case::unreachable(None)]
    #[case::zero(Some(0))]
    #[tokio::test]
    async fn test_unusable_head_skips_cycle(#[case] head: Option<u64>) {
        let mut rpc = MockZoneRpc::new();
        rpc.expect_latest_block_number().returning(move |_| head);
        rpc.expect_block_by_number().never();
        let store = Arc::new(MemoryBlockStore::new());

        let outcome = ingestor(rpc, Some(store.clone())).run_once().await;

        assert_eq!(outcome, CycleOutcome::HeadUnavailable);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_missing_body_skips_cycle() {
        let mut rpc = MockZoneRpc::new();
        rpc.expect_latest_block_number().returning(|_| Some(100));
        rpc.expect_block_by_number().times(1).returning(|_, _, _| None);
        let store = Arc::new(MemoryBlockStore::new());

        let outcome = ingestor(rpc, Some(store.clone())).run_once().await;

        assert_eq!(outcome, CycleOutcome::BodyUnavailable(100));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_without_store() {
        let ingestor = ingestor(rpc_at(100, 0), None);
        assert!(ingestor.is_dry_run());

        let outcome = ingestor.run_once().await;
        assert!(matches!(outcome, CycleOutcome::DryRun(ref b) if b.number == 100));
    }

    #[tokio::test]
    async fn test_write_failure_is_reported_and_next_cycle_runs() {
        let ingestor = ingestor(rpc_at(100, 1), Some(Arc::new(RejectingStore)));

        assert!(matches!(ingestor.run_once().await, CycleOutcome::WriteFailed(_)));
        assert!(matches!(ingestor.run_once().await, CycleOutcome::WriteFailed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_continuous_mode_polls_until_cancelled() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut rpc = MockZoneRpc::new();
        rpc.expect_latest_block_number().returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            None
        });

        let cancellation = CancellationToken::new();
        let ingestor = Arc::new(BlockIngestor::new(
            IngestConfig { zone: ZONE.into(), poll_interval: Duration::from_secs(15) },
            Arc::new(rpc),
            None,
            cancellation.clone(),
        ));
        let handle = tokio::spawn({
            let ingestor = ingestor.clone();
            async move { ingestor.run().await }
        });

        tokio::time::sleep(Duration::from_secs(31)).await;
        cancellation.cancel();
        handle.await.unwrap();

        // Cycles at t = 0s, 15s and 30s.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    /// Takes a second to answer the head query and tracks how many queries overlap.
    #[derive(Debug, Default)]
    struct SlowRpc {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl ZoneRpc for SlowRpc {
        async fn latest_block_number(&self, _: &str) -> Option<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(1)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            None
        }

        async fn block_by_number(&self, _: &str, _: u64, _: bool) -> Option<RpcBlock> {
            None
        }

        async fn gas_price(&self, _: &str) -> Option<u64> {
            None
        }

        async fn balance(&self, _: &str, _: &str) -> Option<U256> {
            None
        }

        async fn transaction_by_hash(&self, _: &str, _: &str) -> Option<RpcTransaction> {
            None
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_cycles_are_serialized() {
        let rpc = Arc::new(SlowRpc::default());
        let config = IngestConfig::default();
        let ingestor = BlockIngestor::new(config, rpc.clone(), None, CancellationToken::new());

        let start = tokio::time::Instant::now();
        let (first, second) = tokio::join!(ingestor.run_once(), ingestor.run_once());

        assert_eq!(first, CycleOutcome::HeadUnavailable);
        assert_eq!(second, CycleOutcome::HeadUnavailable);
        assert_eq!(rpc.calls.load(Ordering::SeqCst), 2);
        assert_eq!(rpc.max_in_flight.load(Ordering::SeqCst), 1);
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[test]
    fn test_only_persisted_cycles_report_a_height() {
        let block = body(100, 0).normalize(ZONE, 100, 0);

        assert_eq!(CycleOutcome::Persisted(block.clone()).persisted_height(), Some(100));
        assert_eq!(CycleOutcome::DryRun(block.clone()).persisted_height(), None);
        assert_eq!(CycleOutcome::WriteFailed(block).persisted_height(), None);
        assert_eq!(CycleOutcome::BodyUnavailable(100).persisted_height(), None);
        assert_eq!(CycleOutcome::HeadUnavailable.persisted_height(), None);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_runs_no_cycle() {
        let mut rpc = MockZoneRpc::new();
        rpc.expect_latest_block_number().never();
        let cancellation = CancellationToken::new();
        cancellation.cancel();

        BlockIngestor::new(IngestConfig::default(), Arc::new(rpc), None, cancellation).run().await;
    }

    #[rstest::rstest]
    #[case(0, "0.00M")]
    #[case(12_345_678, "12.35M")]
    fn test_format_gas(#[case] gas: u64, #[case] expected: &str) {
        assert_eq!(format_gas(gas), expected);
    }

    #[test]
    fn test_short_hash() {
        let hash = format!("0x{:064x}", 1);
        assert_eq!(short_hash(&hash), "0x0000000000000000...");
        assert_eq!(short_hash("unknown"), "unknown");
    }
}
