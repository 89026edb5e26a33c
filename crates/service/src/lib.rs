//! The moving parts of the Quai Insight data core.
//!
//! - [`BlockIngestor`] keeps the persistent store up to date with the head of a zone.
//! - [`TieredResolver`] answers reads from the fastest tier holding the data, falling back from
//!   an in-process [`TtlCache`] to the store and finally to the zone RPC.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod cache;
pub use cache::TtlCache;

mod ingest;
pub use ingest::{BlockIngestor, CycleOutcome, IngestConfig};

mod resolver;
pub use resolver::{CacheKey, Resolved, ResolverConfig, Source, TieredResolver};

mod metrics;
pub use metrics::Metrics;

/// Current wall-clock time in whole seconds since the Unix epoch.
pub(crate) fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
