//! Utilities shared by the Quai Insight binaries.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod error;
pub use error::{CliError, CliResult, PrometheusError};

mod prometheus;
pub use prometheus::init_prometheus_server;

mod subscriber;
pub use subscriber::{init_tracing_subscriber, verbosity_level};

mod styles;
pub use styles::cli_styles;

pub mod log;
pub mod metrics_args;
