//! Aggregation over a fetched bot list.
//!
//! Each aggregator is a pure function of the record slice. They share no
//! state and can run in any order.

pub mod bucket;
pub mod narrative;
pub mod series;

pub use bucket::{bucketize, BUCKET_COUNT, BUCKET_LABELS};
pub use narrative::{classify, Narrative, ScoreBand};
pub use series::{extract, ScatterPoint, SeriesSet};

use crate::config::{NarrativeConfig, ThresholdConfig};
use crate::record::BotRecord;
use serde::Serialize;

/// Everything the Rendering step needs from one bot list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    pub buckets: [u32; BUCKET_COUNT],
    pub series: SeriesSet,
    pub narrative: Narrative,
}

/// Run every aggregator once over the same records.
pub fn aggregate(
    records: &[BotRecord],
    thresholds: &ThresholdConfig,
    narrative: &NarrativeConfig,
) -> Aggregation {
    let series = extract(records);
    let buckets = bucketize(series.scores.iter().copied());
    let narrative = classify(records, thresholds, narrative.correlation);

    Aggregation {
        buckets,
        series,
        narrative,
    }
}
