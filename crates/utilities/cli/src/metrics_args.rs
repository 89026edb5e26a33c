//! Prometheus metrics arguments.

use crate::{CliResult, init_prometheus_server};
use clap::Args;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Configuration of the Prometheus exporter.
#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct MetricsArgs {
    /// Serve Prometheus metrics.
    #[arg(
        long = "metrics.enabled",
        global = true,
        default_value_t = false,
        env = "INSIGHT_METRICS_ENABLED"
    )]
    pub enabled: bool,
    /// Port of the metrics server.
    #[arg(
        long = "metrics.port",
        global = true,
        default_value_t = 9090,
        env = "INSIGHT_METRICS_PORT"
    )]
    pub port: u16,
    /// Address the metrics server binds to.
    #[arg(
        long = "metrics.addr",
        global = true,
        default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        env = "INSIGHT_METRICS_ADDR"
    )]
    pub addr: IpAddr,
}

impl Default for MetricsArgs {
    fn default() -> Self {
        Self { enabled: false, port: 9090, addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED) }
    }
}

impl MetricsArgs {
    /// Starts the exporter if enabled and returns its address.
    pub fn init_metrics(&self) -> CliResult<Option<SocketAddr>> {
        if !self.enabled {
            return Ok(None);
        }
        Ok(Some(init_prometheus_server(self.addr, self.port)?))
    }
}
