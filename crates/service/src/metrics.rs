//! Metrics for ingestion and read resolution.

/// Container for the metric names recorded by this crate.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Counter of ingestion cycles, labelled by zone and outcome.
    pub const INGEST_CYCLES_TOTAL: &'static str = "insight_ingest_cycles_total";
    /// Gauge of the most recently persisted block height, labelled by zone.
    pub const INGEST_LATEST_BLOCK: &'static str = "insight_ingest_latest_block";
    /// Counter of resolver cache lookups, labelled by method and result.
    pub const CACHE_LOOKUPS_TOTAL: &'static str = "insight_cache_lookups_total";
    /// Counter of resolved reads, labelled by method and the tier that served them.
    pub const RESOLVER_READS_TOTAL: &'static str = "insight_resolver_reads_total";

    /// Describes all metrics of this crate.
    pub fn init() {
        metrics::describe_counter!(
            Self::INGEST_CYCLES_TOTAL,
            metrics::Unit::Count,
            "Total number of ingestion cycles by outcome",
        );
        metrics::describe_gauge!(
            Self::INGEST_LATEST_BLOCK,
            "Height of the most recently persisted block",
        );
        metrics::describe_counter!(
            Self::CACHE_LOOKUPS_TOTAL,
            metrics::Unit::Count,
            "Total number of resolver cache lookups by result",
        );
        metrics::describe_counter!(
            Self::RESOLVER_READS_TOTAL,
            metrics::Unit::Count,
            "Total number of resolved reads by serving tier",
        );
    }

    pub(crate) fn record_cycle(zone: &str, outcome: &'static str, persisted: Option<u64>) {
        metrics::counter!(
            Self::INGEST_CYCLES_TOTAL,
            "zone" => zone.to_string(),
            "outcome" => outcome,
        )
        .increment(1);
        if let Some(number) = persisted {
            metrics::gauge!(Self::INGEST_LATEST_BLOCK, "zone" => zone.to_string())
                .set(number as f64);
        }
    }

    pub(crate) fn record_cache_lookup(method: &'static str, hit: bool) {
        let result = if hit { "hit" } else { "miss" };
        metrics::counter!(Self::CACHE_LOOKUPS_TOTAL, "method" => method, "result" => result)
            .increment(1);
    }

    pub(crate) fn record_read(method: &'static str, source: &'static str) {
        metrics::counter!(Self::RESOLVER_READS_TOTAL, "method" => method, "source" => source)
            .increment(1);
    }
}
