//! JSON-RPC client for Quai zone endpoints.

use crate::{Metrics, RpcError};
use insight_protocol::resolve_endpoint;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    future::Future,
    time::{Duration, Instant},
};
use tracing::trace;
use url::Url;

/// Timeout applied to every request unless configured otherwise.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the [`RpcClient`].
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// Upper bound for a single request, including reading the response body.
    pub timeout: Duration,
    /// Sends every request to this URL instead of the registry endpoint of the zone.
    pub endpoint_override: Option<Url>,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self { timeout: DEFAULT_RPC_TIMEOUT, endpoint_override: None }
    }
}

#[derive(Debug, Serialize)]
struct RequestEnvelope<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: &'a [Value],
}

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RemoteError>,
}

#[derive(Debug, Deserialize)]
struct RemoteError {
    #[serde(default)]
    message: Option<String>,
}

impl ResponseEnvelope {
    fn into_result(self) -> Result<Value, RpcError> {
        if let Some(error) = self.error {
            return Err(RpcError::Remote {
                message: error.message.unwrap_or_else(|| "RPC Error".to_string()),
            });
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}

/// A JSON-RPC client that resolves zone endpoints through the registry.
///
/// The client performs no retries. Each call is bounded by [`RpcConfig::timeout`]; when the
/// timeout fires the in-flight request is dropped.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    config: RpcConfig,
}

impl Default for RpcClient {
    fn default() -> Self {
        Self::new(RpcConfig::default())
    }
}

impl RpcClient {
    /// Creates a new [`RpcClient`].
    pub fn new(config: RpcConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    /// Returns the client configuration.
    pub const fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Returns the endpoint requests for `zone` are sent to.
    pub fn endpoint(&self, zone: &str) -> &str {
        self.config.endpoint_override.as_ref().map_or_else(|| resolve_endpoint(zone), Url::as_str)
    }

    /// Calls `method` on the endpoint of `zone` and returns the undecoded `result` member.
    ///
    /// A `null` result is returned as [`Value::Null`].
    pub async fn call(
        &self,
        zone: &str,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value, RpcError> {
        let endpoint = self.endpoint(zone);
        let request = RequestEnvelope { jsonrpc: "2.0", id: 1, method, params: &params };
        trace!(target: "rpc", zone, method, endpoint, "Sending request");

        let start = Instant::now();
        let result = bounded(self.config.timeout, self.send(endpoint, &request)).await;
        Metrics::record_request(method, start.elapsed(), &result);
        result
    }

    async fn send(&self, endpoint: &str, request: &RequestEnvelope<'_>) -> Result<Value, RpcError> {
        let response = self.http.post(endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Transport {
                status: Some(status.as_u16()),
                message: format!("HTTP error! status: {status}"),
            });
        }

        let envelope: ResponseEnvelope =
            response.json().await.map_err(|e| RpcError::InvalidResponse(e.to_string()))?;
        envelope.into_result()
    }
}

/// Runs `fut` to completion or fails with [`RpcError::Timeout`], dropping the future.
pub(crate) async fn bounded<F, T>(timeout: Duration, fut: F) -> Result<T, RpcError>
where
    F: Future<Output = Result<T, RpcError>>,
{
    tokio::time::timeout(timeout, fut).await.unwrap_or(Err(RpcError::Timeout(timeout)))
}
