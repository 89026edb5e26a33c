//! Core types shared by the Quai Insight data pipeline.
//!
//! Contains the static zone registry, the canonical [`Block`] and [`Transaction`] shapes that
//! every read path normalizes into, and the lenient hex decoding helpers used at the RPC
//! boundary.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod zones;
pub use zones::{DEFAULT_ZONE, Region, ZONES, Zone, resolve_endpoint, zone, zones_in};

mod block;
pub use block::{Block, NetworkStats, Transaction};

pub mod hex;
pub use hex::{DecodeError, decode_hex, decode_hex_value};

pub mod units;
pub use units::{truncate_hash, wei_to_gwei, wei_to_quai};

mod search;
pub use search::SearchQuery;
