//! Clients for the remote chain data sources of a Quai zone.
//!
//! - [`RpcClient`] speaks JSON-RPC to a zone endpoint with a bounded timeout. Its typed
//!   [`ZoneRpc`] methods swallow failures and report absence instead.
//! - [`ExplorerClient`] reads the paginated block explorer REST API.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod error;
pub use error::RpcError;

mod client;
pub use client::{DEFAULT_RPC_TIMEOUT, RpcClient, RpcConfig};

mod zone_rpc;
#[cfg(any(test, feature = "test-utils"))]
pub use zone_rpc::MockZoneRpc;
pub use zone_rpc::ZoneRpc;

mod types;
pub use types::{RpcBlock, RpcTransaction};

mod explorer;
pub use explorer::{ExplorerClient, QUAISCAN_API_BASE};

mod metrics;
pub use metrics::Metrics;
