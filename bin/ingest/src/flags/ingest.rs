//! Ingestion arguments.

use clap::Args;
use insight_protocol::{DEFAULT_ZONE, zone};
use insight_rpc::{DEFAULT_RPC_TIMEOUT, RpcConfig};
use insight_service::IngestConfig;
use std::time::Duration;
use tracing::warn;
use url::Url;

/// What to ingest and how often.
#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub(crate) struct IngestArgs {
    /// Keep polling until interrupted instead of running a single cycle.
    #[arg(long, short = 'c')]
    pub(crate) continuous: bool,
    /// Zone to ingest.
    #[arg(long, default_value = DEFAULT_ZONE, env = "QUAI_ZONE")]
    pub(crate) zone: String,
    /// Seconds between ingestion cycles in continuous mode.
    #[arg(
        long = "poll-interval",
        default_value_t = IngestConfig::DEFAULT_POLL_INTERVAL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..),
        env = "INSIGHT_POLL_INTERVAL"
    )]
    pub(crate) poll_interval: u64,
    /// Seconds before an RPC request is abandoned.
    #[arg(
        long = "rpc.timeout",
        default_value_t = DEFAULT_RPC_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..),
        env = "INSIGHT_RPC_TIMEOUT"
    )]
    pub(crate) rpc_timeout: u64,
    /// Send RPC requests to this URL instead of the public endpoint of the zone.
    #[arg(long = "rpc.url", env = "QUAI_RPC_URL")]
    pub(crate) rpc_url: Option<Url>,
}

impl IngestArgs {
    /// Returns the zone to ingest, falling back to the default zone for unknown identifiers.
    pub(crate) fn zone(&self) -> &str {
        if zone(&self.zone).is_some() {
            return &self.zone;
        }
        warn!(target: "ingest", zone = %self.zone, fallback = DEFAULT_ZONE, "Unknown zone");
        DEFAULT_ZONE
    }

    /// Builds the ingestor configuration.
    pub(crate) fn ingest_config(&self) -> IngestConfig {
        IngestConfig {
            zone: self.zone().to_string(),
            poll_interval: Duration::from_secs(self.poll_interval),
        }
    }

    /// Builds the RPC client configuration.
    pub(crate) fn rpc_config(&self) -> RpcConfig {
        RpcConfig {
            timeout: Duration::from_secs(self.rpc_timeout),
            endpoint_override: self.rpc_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rstest::rstest;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        ingest: IngestArgs,
    }

    fn parse(args: &[&str]) -> IngestArgs {
        TestCli::try_parse_from(std::iter::once("test").chain(args.iter().copied()))
            .unwrap()
            .ingest
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["--zone", "cyprus-1"]);
        assert!(!args.continuous);
        assert_eq!(args.ingest_config().poll_interval, Duration::from_secs(15));
        assert_eq!(args.rpc_config().timeout, Duration::from_secs(5));
        assert_eq!(args.rpc_config().endpoint_override, None);
    }

    #[rstest]
    #[case::long(&["--continuous"])]
    #[case::short(&["-c"])]
    fn test_continuous_flag(#[case] args: &[&str]) {
        assert!(parse(args).continuous);
    }

    #[rstest]
    #[case("paxos-2", "paxos-2")]
    #[case("hydra-3", "hydra-3")]
    #[case("atlantis-9", "cyprus-1")]
    fn test_zone_fallback(#[case] zone: &str, #[case] expected: &str) {
        assert_eq!(parse(&["--zone", zone]).ingest_config().zone, expected);
    }

    #[test]
    fn test_rpc_overrides() {
        let args = parse(&["--rpc.timeout", "2", "--rpc.url", "http://localhost:9001/"]);
        let config = args.rpc_config();
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.endpoint_override.unwrap().as_str(), "http://localhost:9001/");
    }

    #[rstest]
    #[case::zero_interval(&["--poll-interval", "0"])]
    #[case::zero_timeout(&["--rpc.timeout", "0"])]
    #[case::bad_url(&["--rpc.url", "not a url"])]
    fn test_invalid_values_are_rejected(#[case] args: &[&str]) {
        let argv = std::iter::once("test").chain(args.iter().copied());
        assert!(TestCli::try_parse_from(argv).is_err());
    }
}
