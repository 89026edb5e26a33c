//! Contains the ingestion CLI.

use crate::flags::{GlobalArgs, IngestArgs, StoreArgs};
use anyhow::Result;
use clap::Parser;
use insight_cli::cli_styles;
use insight_rpc::RpcClient;
use insight_service::{BlockIngestor, CycleOutcome};
use insight_storage::{BlockStorage, PostgrestBlockStore};
use std::{future::Future, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Quai Insight block ingestion.
///
/// Fetches the latest block of a zone over JSON-RPC and upserts it into the block store. Without
/// store credentials the block is only reported.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, styles = cli_styles(), long_about = None)]
pub(crate) struct Cli {
    /// Global arguments for the CLI.
    #[command(flatten)]
    pub(crate) global: GlobalArgs,
    /// Ingestion arguments.
    #[command(flatten)]
    pub(crate) ingest: IngestArgs,
    /// Block store arguments.
    #[command(flatten)]
    pub(crate) store: StoreArgs,
}

impl Cli {
    /// Runs the CLI.
    pub(crate) fn run(self) -> Result<()> {
        self.init_stack()?;
        Self::run_until_ctrl_c(self.start())
    }

    /// Initializes the tracing subscriber and, if enabled, the Prometheus exporter.
    fn init_stack(&self) -> Result<()> {
        self.global.log_args.init_tracing()?;
        if let Some(addr) = self.global.metrics.init_metrics()? {
            insight_rpc::Metrics::init();
            insight_service::Metrics::init();
            info!(target: "ingest", %addr, "Metrics enabled");
        }
        Ok(())
    }

    /// Builds the ingestor and runs one cycle, or polls until interrupted in continuous mode.
    async fn start(self) -> Result<()> {
        let config = self.ingest.ingest_config();
        let rpc = Arc::new(RpcClient::new(self.ingest.rpc_config()));
        let store = self.store.config().map(|config| {
            Arc::new(PostgrestBlockStore::new(config)) as Arc<dyn BlockStorage>
        });

        let store_mode = if store.is_some() { "connected" } else { "not configured (dry run)" };
        info!(
            target: "ingest",
            zone = %config.zone,
            rpc = rpc.endpoint(&config.zone),
            interval = ?config.poll_interval,
            store = store_mode,
            continuous = self.ingest.continuous,
            "Quai Insight block ingestion"
        );

        let cancellation = CancellationToken::new();
        let ingestor = BlockIngestor::new(config, rpc.clone(), store, cancellation.clone());

        if !self.ingest.continuous {
            let outcome = ingestor.run_once().await;
            if matches!(outcome, CycleOutcome::HeadUnavailable) {
                let endpoint = rpc.endpoint(&ingestor.config().zone);
                warn!(target: "ingest", endpoint, "Failed to connect to zone RPC");
            }
            info!(target: "ingest", "Ingestion complete");
            return Ok(());
        }

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!(target: "ingest", "Received Ctrl-C, shutting down");
                    cancellation.cancel();
                }
                Err(err) => warn!(target: "ingest", %err, "Failed to listen for Ctrl-C"),
            }
        });
        ingestor.run().await;
        Ok(())
    }

    /// Runs `fut` to completion on a fresh multi-thread runtime.
    pub(crate) fn run_until_ctrl_c<F>(fut: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        let rt = Self::tokio_runtime().map_err(|e| anyhow::anyhow!(e))?;
        rt.block_on(fut)
    }

    /// Creates a new default tokio multi-thread [Runtime](tokio::runtime::Runtime) with all
    /// features enabled
    pub(crate) fn tokio_runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
        tokio::runtime::Builder::new_multi_thread().enable_all().build()
    }
}
