//! Histogram conversion.
//!
//! Every histogram point is split into a `_count` point, an unsuffixed sum point
//! and one `_bucket` point per bucket, tagged with its `upper_bound`.

use otlp_sfx_protocol::{Datum, Dimension};

use super::{number::number_to_datum, BasePoint, Conversion};
use crate::{model::HistogramDataPoint, SkipReason, Skipped};

/// Dimension key carrying a bucket's upper bound.
pub const UPPER_BOUND_DIMENSION: &str = "upper_bound";

pub(super) fn convert_histogram(
    data_points: &[HistogramDataPoint],
    base: &BasePoint<'_>,
    out: &mut Conversion,
) {
    let count_name = format!("{}_count", base.metric);
    let bucket_name = format!("{}_bucket", base.metric);

    for hdp in data_points {
        let mut count_dp = base.point(count_name.clone(), hdp.time_unix_nano, &hdp.labels);
        count_dp.value = Some(Datum::int(hdp.count as i64));

        let mut sum_dp = base.point(base.metric.to_owned(), hdp.time_unix_nano, &hdp.labels);
        sum_dp.value = Some(number_to_datum(hdp.sum));

        out.datapoints.push(count_dp);
        out.datapoints.push(sum_dp);

        // Bucket counts are optional, but when present there must be one more
        // than there are bounds.
        if !hdp.has_valid_buckets() {
            out.skipped.push(Skipped::new(
                base.metric,
                SkipReason::BucketCountMismatch {
                    bounds: hdp.explicit_bounds.len(),
                    bucket_counts: hdp.bucket_counts.len(),
                },
                0,
            ));
            continue;
        }

        out.datapoints.reserve(hdp.bucket_counts.len());
        for (j, count) in hdp.bucket_counts.iter().enumerate() {
            let bound = hdp
                .explicit_bounds
                .get(j)
                .copied()
                .unwrap_or(f64::INFINITY);
            let mut dp = base.point(bucket_name.clone(), hdp.time_unix_nano, &hdp.labels);
            dp.dimensions
                .push(Dimension::new(UPPER_BOUND_DIMENSION, format_bound(bound)));
            dp.value = Some(Datum::int(*count as i64));
            out.datapoints.push(dp);
        }
    }
}

/// Formats a bucket bound the way Prometheus renders `le` labels.
///
/// Shortest round-trip digits; scientific notation when the decimal exponent is
/// below -4 or at least 6, e.g. `0.5`, `100`, `1e+06`, `2.5e-07`, `+Inf`.
pub fn format_bound(bound: f64) -> String {
    if bound.is_nan() {
        return "NaN".to_owned();
    }
    if bound.is_infinite() {
        return if bound > 0.0 { "+Inf" } else { "-Inf" }.to_owned();
    }
    if bound == 0.0 {
        // Keeps the sign of negative zero.
        return bound.to_string();
    }
    // `{:e}` yields the shortest digits, e.g. "1.5e6" or "-2.5e-7".
    let scientific = format!("{bound:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return bound.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or_default();
    if (-4..6).contains(&exponent) {
        bound.to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    }
}
