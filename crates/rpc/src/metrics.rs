//! Metrics for the remote data sources.

use crate::RpcError;
use std::time::Duration;

/// Container for the metric names recorded by this crate.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Counter of JSON-RPC requests, labelled by method and outcome.
    pub const RPC_REQUESTS_TOTAL: &'static str = "insight_rpc_requests_total";
    /// Histogram of JSON-RPC request latency, labelled by method.
    pub const RPC_REQUEST_DURATION_SECONDS: &'static str = "insight_rpc_request_duration_seconds";
    /// Counter of block explorer requests, labelled by endpoint and outcome.
    pub const EXPLORER_REQUESTS_TOTAL: &'static str = "insight_explorer_requests_total";

    /// Describes all metrics of this crate.
    pub fn init() {
        metrics::describe_counter!(
            Self::RPC_REQUESTS_TOTAL,
            metrics::Unit::Count,
            "Total number of JSON-RPC requests sent to zone endpoints",
        );
        metrics::describe_histogram!(
            Self::RPC_REQUEST_DURATION_SECONDS,
            metrics::Unit::Seconds,
            "Latency of JSON-RPC requests sent to zone endpoints",
        );
        metrics::describe_counter!(
            Self::EXPLORER_REQUESTS_TOTAL,
            metrics::Unit::Count,
            "Total number of block explorer REST requests",
        );
    }

    pub(crate) fn record_request<T>(
        method: &str,
        elapsed: Duration,
        result: &Result<T, RpcError>,
    ) {
        metrics::counter!(
            Self::RPC_REQUESTS_TOTAL,
            "method" => method.to_string(),
            "outcome" => outcome(result),
        )
        .increment(1);
        metrics::histogram!(Self::RPC_REQUEST_DURATION_SECONDS, "method" => method.to_string())
            .record(elapsed.as_secs_f64());
    }

    pub(crate) fn record_explorer_request<T>(endpoint: &'static str, result: &Result<T, RpcError>) {
        metrics::counter!(
            Self::EXPLORER_REQUESTS_TOTAL,
            "endpoint" => endpoint,
            "outcome" => outcome(result),
        )
        .increment(1);
    }
}

fn outcome<T>(result: &Result<T, RpcError>) -> &'static str {
    result.as_ref().map_or_else(RpcError::kind, |_| "success")
}
