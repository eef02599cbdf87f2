//! Builders for test inputs.

use crate::model::{
    HistogramDataPoint, Labels, Metric, MetricData, NumberDataPoint, Temporality,
};

pub fn labels(pairs: &[(&str, &str)]) -> Labels {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

pub fn gauge(name: &str, data_points: Vec<NumberDataPoint>) -> Metric {
    Metric {
        name: name.to_owned(),
        data: Some(MetricData::Gauge { data_points }),
    }
}

pub fn sum(
    name: &str,
    is_monotonic: bool,
    temporality: Temporality,
    data_points: Vec<NumberDataPoint>,
) -> Metric {
    Metric {
        name: name.to_owned(),
        data: Some(MetricData::Sum {
            is_monotonic,
            temporality,
            data_points,
        }),
    }
}

pub fn histogram(
    name: &str,
    temporality: Temporality,
    data_points: Vec<HistogramDataPoint>,
) -> Metric {
    Metric {
        name: name.to_owned(),
        data: Some(MetricData::Histogram {
            temporality,
            data_points,
        }),
    }
}
