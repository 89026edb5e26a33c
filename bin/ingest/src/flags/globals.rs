//! Global arguments for the CLI.

use clap::Args;
use insight_cli::{log::LogArgs, metrics_args::MetricsArgs};

/// Global arguments for the CLI.
#[derive(Args, Default, Clone, Debug)]
pub(crate) struct GlobalArgs {
    /// Logging arguments.
    #[command(flatten)]
    pub(crate) log_args: LogArgs,
    /// Prometheus CLI arguments.
    #[command(flatten)]
    pub(crate) metrics: MetricsArgs,
}
