//! The static Quai zone registry.

use derive_more::Display;
use serde::Serialize;

/// The zone every unknown identifier degrades to.
pub const DEFAULT_ZONE: &str = "cyprus-1";

/// A top-level region of the Quai hierarchy. Each region groups three zones.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Region {
    /// The Cyprus region.
    Cyprus,
    /// The Paxos region.
    Paxos,
    /// The Hydra region.
    Hydra,
}

/// An independently block-producing partition of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    /// Stable identifier, e.g. `cyprus-1`.
    pub id: &'static str,
    /// Human readable name, e.g. `Cyprus-1`.
    pub display_name: &'static str,
    /// The region this zone belongs to.
    pub region: Region,
    /// The JSON-RPC endpoint serving this zone.
    pub endpoint: &'static str,
}

impl Zone {
    /// Returns the shard name used by the block explorer, which drops the dash
    /// (`cyprus-1` becomes `cyprus1`).
    pub fn shard_param(&self) -> String {
        self.id.replace('-', "")
    }
}

macro_rules! zone {
    ($id:literal, $name:literal, $region:ident, $path:literal) => {
        Zone {
            id: $id,
            display_name: $name,
            region: Region::$region,
            endpoint: concat!("https://rpc.quai.network/", $path),
        }
    };
}

/// Every zone known to the registry. The set is closed and fixed.
pub static ZONES: [Zone; 9] = [
    zone!("cyprus-1", "Cyprus-1", Cyprus, "cyprus1"),
    zone!("cyprus-2", "Cyprus-2", Cyprus, "cyprus2"),
    zone!("cyprus-3", "Cyprus-3", Cyprus, "cyprus3"),
    zone!("paxos-1", "Paxos-1", Paxos, "paxos1"),
    zone!("paxos-2", "Paxos-2", Paxos, "paxos2"),
    zone!("paxos-3", "Paxos-3", Paxos, "paxos3"),
    zone!("hydra-1", "Hydra-1", Hydra, "hydra1"),
    zone!("hydra-2", "Hydra-2", Hydra, "hydra2"),
    zone!("hydra-3", "Hydra-3", Hydra, "hydra3"),
];

/// Returns the [`Zone`] registered under `id`, if any.
pub fn zone(id: &str) -> Option<&'static Zone> {
    ZONES.iter().find(|z| z.id == id)
}

/// Returns all zones of the given [`Region`] in registry order.
pub fn zones_in(region: Region) -> impl Iterator<Item = &'static Zone> {
    ZONES.iter().filter(move |z| z.region == region)
}

/// Resolves the RPC endpoint for `zone_id`.
///
/// Unknown identifiers resolve to the endpoint of [`DEFAULT_ZONE`]; this never fails.
pub fn resolve_endpoint(zone_id: &str) -> &'static str {
    zone(zone_id).unwrap_or(&ZONES[0]).endpoint
}
