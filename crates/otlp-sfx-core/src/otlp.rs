//! Conversion from OTLP protobuf messages into the converter's model.

use opentelemetry_proto::tonic::{
    common::v1::{any_value::Value, AnyValue, KeyValue},
    metrics::v1::{self as otlp, metric::Data, number_data_point, AggregationTemporality},
    resource::v1::Resource as OtlpResource,
};

use crate::model::{
    AttributeValue, HistogramDataPoint, Labels, Metric, MetricData, NumberDataPoint, NumberValue,
    Resource, ResourceMetrics, ScopeMetrics, Temporality,
};

impl From<&otlp::ResourceMetrics> for ResourceMetrics {
    fn from(rm: &otlp::ResourceMetrics) -> Self {
        ResourceMetrics {
            resource: rm.resource.as_ref().map(Resource::from).unwrap_or_default(),
            scope_metrics: rm.scope_metrics.iter().map(ScopeMetrics::from).collect(),
        }
    }
}

impl From<&OtlpResource> for Resource {
    fn from(resource: &OtlpResource) -> Self {
        Resource {
            attributes: resource
                .attributes
                .iter()
                .filter_map(|kv| Some((kv.key.clone(), attribute_value(kv.value.as_ref()?)?)))
                .collect(),
        }
    }
}

impl From<&otlp::ScopeMetrics> for ScopeMetrics {
    fn from(sm: &otlp::ScopeMetrics) -> Self {
        let (scope_name, scope_version) = sm
            .scope
            .as_ref()
            .map(|s| (s.name.clone(), s.version.clone()))
            .unwrap_or_default();
        ScopeMetrics {
            scope_name,
            scope_version,
            metrics: sm.metrics.iter().map(Metric::from).collect(),
        }
    }
}

impl From<&otlp::Metric> for Metric {
    fn from(metric: &otlp::Metric) -> Self {
        let data = match &metric.data {
            Some(Data::Gauge(gauge)) => Some(MetricData::Gauge {
                data_points: number_points(&metric.name, &gauge.data_points),
            }),
            Some(Data::Sum(sum)) => Some(MetricData::Sum {
                is_monotonic: sum.is_monotonic,
                temporality: temporality(sum.aggregation_temporality),
                data_points: number_points(&metric.name, &sum.data_points),
            }),
            Some(Data::Histogram(histogram)) => Some(MetricData::Histogram {
                temporality: temporality(histogram.aggregation_temporality),
                data_points: histogram.data_points.iter().map(histogram_point).collect(),
            }),
            Some(Data::ExponentialHistogram(_)) => {
                log::debug!("Exponential histogram {} is not supported", metric.name);
                None
            }
            Some(Data::Summary(_)) => {
                log::debug!("Summary {} is not supported", metric.name);
                None
            }
            None => None,
        };
        Metric {
            name: metric.name.clone(),
            data,
        }
    }
}

fn temporality(value: i32) -> Temporality {
    match AggregationTemporality::try_from(value) {
        Ok(AggregationTemporality::Delta) => Temporality::Delta,
        Ok(AggregationTemporality::Cumulative) => Temporality::Cumulative,
        _ => Temporality::Unspecified,
    }
}

fn number_points(metric: &str, points: &[otlp::NumberDataPoint]) -> Vec<NumberDataPoint> {
    points
        .iter()
        .filter_map(|p| {
            let value = match p.value {
                Some(number_data_point::Value::AsInt(v)) => NumberValue::Int(v),
                Some(number_data_point::Value::AsDouble(v)) => NumberValue::Double(v),
                None => {
                    log::debug!("Dropping data point without a value from {metric}");
                    return None;
                }
            };
            Some(NumberDataPoint {
                time_unix_nano: p.time_unix_nano,
                value,
                labels: labels(&p.attributes),
            })
        })
        .collect()
}

fn histogram_point(p: &otlp::HistogramDataPoint) -> HistogramDataPoint {
    HistogramDataPoint {
        time_unix_nano: p.time_unix_nano,
        labels: labels(&p.attributes),
        count: p.count,
        sum: NumberValue::Double(p.sum.unwrap_or_default()),
        explicit_bounds: p.explicit_bounds.clone(),
        bucket_counts: p.bucket_counts.clone(),
    }
}

fn labels(attributes: &[KeyValue]) -> Labels {
    attributes
        .iter()
        .filter_map(|kv| {
            let value = attribute_value(kv.value.as_ref()?)?;
            Some((kv.key.clone(), value.to_string()))
        })
        .collect()
}

/// Maps an OTLP value onto the attribute model.
///
/// Arrays and key-value lists are carried as their JSON text. Bytes and empty
/// values have no text form and are dropped.
fn attribute_value(value: &AnyValue) -> Option<AttributeValue> {
    match value.value.as_ref()? {
        Value::StringValue(s) => Some(AttributeValue::String(s.clone())),
        Value::BoolValue(b) => Some(AttributeValue::Bool(*b)),
        Value::IntValue(i) => Some(AttributeValue::Int(*i)),
        Value::DoubleValue(d) => Some(AttributeValue::Double(*d)),
        Value::ArrayValue(_) | Value::KvlistValue(_) => {
            Some(AttributeValue::String(to_json(value).to_string()))
        }
        Value::BytesValue(_) => None,
    }
}

fn to_json(value: &AnyValue) -> serde_json::Value {
    match &value.value {
        Some(Value::StringValue(s)) => serde_json::Value::from(s.as_str()),
        Some(Value::BoolValue(b)) => serde_json::Value::from(*b),
        Some(Value::IntValue(i)) => serde_json::Value::from(*i),
        Some(Value::DoubleValue(d)) => serde_json::Value::from(*d),
        Some(Value::ArrayValue(array)) => {
            serde_json::Value::Array(array.values.iter().map(to_json).collect())
        }
        Some(Value::KvlistValue(kvs)) => serde_json::Value::Object(
            kvs.values
                .iter()
                .map(|kv| {
                    let v = kv.value.as_ref().map(to_json).unwrap_or_default();
                    (kv.key.clone(), v)
                })
                .collect(),
        ),
        Some(Value::BytesValue(_)) | None => serde_json::Value::Null,
    }
}
