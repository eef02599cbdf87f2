//! Gauge and sum conversion: one datapoint per data point.

use otlp_sfx_protocol::{DataPoint, Datum};

use super::BasePoint;
use crate::model::{NumberDataPoint, NumberValue};

pub(super) fn convert_number_datapoints(
    data_points: &[NumberDataPoint],
    base: &BasePoint<'_>,
    out: &mut Vec<DataPoint>,
) {
    out.reserve(data_points.len());
    for point in data_points {
        let mut dp = base.point(base.metric.to_owned(), point.time_unix_nano, &point.labels);
        dp.value = Some(number_to_datum(point.value));
        out.push(dp);
    }
}

/// Keeps the integer / floating point kind of a value.
pub(super) fn number_to_datum(value: NumberValue) -> Datum {
    match value {
        NumberValue::Int(v) => Datum::int(v),
        NumberValue::Double(v) => Datum::double(v),
    }
}
