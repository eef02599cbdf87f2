use thiserror::Error;

/// Why part of a batch was not converted.
///
/// None of these abort a conversion; the rest of the batch still converts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("metric has no data in a supported shape")]
    MissingData,

    #[error("monotonic metric has an unspecified aggregation temporality")]
    UnspecifiedTemporality,

    #[error("histogram has {bucket_counts} bucket counts for {bounds} explicit bounds, buckets dropped")]
    BucketCountMismatch { bounds: usize, bucket_counts: usize },
}

/// A skipped metric, or part of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// Name of the metric the skip applies to.
    pub metric: String,
    pub reason: SkipReason,
    /// Input data points that produced no output at all.
    pub dropped_points: usize,
}

impl Skipped {
    pub(crate) fn new(metric: &str, reason: SkipReason, dropped_points: usize) -> Skipped {
        Skipped {
            metric: metric.to_owned(),
            reason,
            dropped_points,
        }
    }
}
