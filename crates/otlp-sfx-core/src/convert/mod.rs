//! Conversion of resource metrics into SignalFx datapoints.

mod histogram;
mod number;

use otlp_sfx_protocol::{DataPoint, Dimension, MetricType};

use crate::{
    dimensions::resource_dimensions,
    model::{Labels, Metric, MetricData, ResourceMetrics, Temporality},
    sanitize::sanitize_datapoint_dimensions,
    translator::{DiagnosticSink, LogSink, MetricTranslator},
    SkipReason, Skipped,
};

pub use histogram::{format_bound, UPPER_BOUND_DIMENSION};

/// Result of converting one resource-scoped batch.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Conversion {
    /// Converted, sanitized and translated datapoints.
    pub datapoints: Vec<DataPoint>,
    /// Everything that was left out, in the order it was encountered.
    pub skipped: Vec<Skipped>,
}

/// Converts metrics into SignalFx datapoints, optionally passing the result
/// through a [`MetricTranslator`].
pub struct MetricsConverter {
    translator: Option<Box<dyn MetricTranslator>>,
}

impl MetricsConverter {
    /// Constructs a converter. Pass `None` to skip translation rules.
    pub fn new(translator: Option<Box<dyn MetricTranslator>>) -> MetricsConverter {
        MetricsConverter { translator }
    }

    /// Converts a batch, reporting diagnostics through the `log` facade.
    pub fn convert(&self, rm: &ResourceMetrics) -> Conversion {
        self.convert_with(rm, &LogSink)
    }

    /// Converts a batch, reporting diagnostics to the given sink.
    pub fn convert_with(&self, rm: &ResourceMetrics, sink: &dyn DiagnosticSink) -> Conversion {
        let extra_dims = resource_dimensions(&rm.resource);
        let mut conversion = Conversion::default();

        for metric in rm.metrics() {
            let before = conversion.skipped.len();
            metric_to_datapoints(metric, &extra_dims, &mut conversion);
            for skipped in &conversion.skipped[before..] {
                sink.skipped(skipped);
            }
        }
        sanitize_datapoint_dimensions(&mut conversion.datapoints);

        if let Some(translator) = &self.translator {
            let datapoints = std::mem::take(&mut conversion.datapoints);
            conversion.datapoints = translator.translate_datapoints(datapoints, sink);
        }
        log::trace!(
            "Converted {} datapoints, skipped {}",
            conversion.datapoints.len(),
            conversion.skipped.len()
        );
        conversion
    }
}

/// Classifies a metric into the SignalFx metric type its points are sent as.
///
/// Returns `None` for combinations that have no SignalFx equivalent.
pub fn metric_type_for(data: &MetricData) -> Option<MetricType> {
    match data {
        MetricData::Gauge { .. } => Some(MetricType::Gauge),
        MetricData::Sum {
            is_monotonic: false,
            ..
        } => Some(MetricType::Gauge),
        MetricData::Sum { temporality, .. } | MetricData::Histogram { temporality, .. } => {
            match temporality {
                Temporality::Delta => Some(MetricType::Counter),
                Temporality::Cumulative => Some(MetricType::CumulativeCounter),
                Temporality::Unspecified => None,
            }
        }
    }
}

fn metric_to_datapoints(metric: &Metric, extra_dims: &[Dimension], out: &mut Conversion) {
    let Some(data) = &metric.data else {
        out.skipped
            .push(Skipped::new(&metric.name, SkipReason::MissingData, 0));
        return;
    };
    let Some(metric_type) = metric_type_for(data) else {
        out.skipped.push(Skipped::new(
            &metric.name,
            SkipReason::UnspecifiedTemporality,
            data.data_point_count(),
        ));
        return;
    };
    let base = BasePoint {
        metric: &metric.name,
        metric_type,
        extra_dims,
    };
    match data {
        MetricData::Gauge { data_points } | MetricData::Sum { data_points, .. } => {
            number::convert_number_datapoints(data_points, &base, &mut out.datapoints)
        }
        MetricData::Histogram { data_points, .. } => {
            histogram::convert_histogram(data_points, &base, out)
        }
    }
}

/// The parts shared by every point produced from one metric.
struct BasePoint<'a> {
    metric: &'a str,
    metric_type: MetricType,
    /// Resource level dimensions; read only.
    extra_dims: &'a [Dimension],
}

impl BasePoint<'_> {
    /// Starts a new point. Resource dimensions come first, labels after.
    fn point(&self, metric: String, time_unix_nano: u64, labels: &Labels) -> DataPoint {
        let mut dp = DataPoint {
            metric,
            timestamp: timestamp_to_signalfx(time_unix_nano),
            dimensions: labels_to_dimensions(labels, self.extra_dims),
            ..Default::default()
        };
        dp.set_metric_type(self.metric_type);
        dp
    }
}

fn labels_to_dimensions(labels: &Labels, extra_dims: &[Dimension]) -> Vec<Dimension> {
    let mut dims = Vec::with_capacity(extra_dims.len() + labels.len() + 1);
    dims.extend(itertools::chain(
        extra_dims.iter().cloned(),
        labels.iter().map(|(k, v)| Dimension::new(k.as_str(), v.as_str())),
    ));
    dims
}

/// Nanoseconds to milliseconds since the unix epoch.
fn timestamp_to_signalfx(time_unix_nano: u64) -> i64 {
    (time_unix_nano / 1_000_000) as i64
}
