//! Vendor-neutral metric model consumed by the converter.
//!
//! Resource -> scope -> metric -> data points, with every metric typed as a
//! gauge, a sum or a histogram.

use std::{collections::BTreeMap, fmt};

/// Typed value of a resource attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Bool(bool),
    Int(i64),
    Double(f64),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => f.write_str(s),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Int(i) => write!(f, "{i}"),
            AttributeValue::Double(d) if d.is_infinite() => {
                f.write_str(if *d > 0.0 { "+Inf" } else { "-Inf" })
            }
            AttributeValue::Double(d) => write!(f, "{d}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Double(value)
    }
}

/// The entity that produced a batch of metrics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    /// Attributes in the order they were reported.
    pub attributes: Vec<(String, AttributeValue)>,
}

impl Resource {
    pub fn new<K, V, I>(attributes: I) -> Resource
    where
        K: Into<String>,
        V: Into<AttributeValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Resource {
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the first attribute with the given key.
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns the attribute with the given key if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(AttributeValue::String(s)) => Some(s),
            _ => None,
        }
    }
}

/// How a sum or histogram relates to its reporting interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporality {
    Unspecified,
    /// Change since the last report.
    Delta,
    /// Total since a fixed start time.
    Cumulative,
}

/// A numeric value. Integer and floating point values are never mixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberValue {
    Int(i64),
    Double(f64),
}

/// Per-series labels. Keys are unique, order carries no meaning.
pub type Labels = BTreeMap<String, String>;

/// A gauge or sum data point.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberDataPoint {
    pub time_unix_nano: u64,
    pub value: NumberValue,
    pub labels: Labels,
}

/// An explicit-bucket histogram data point.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramDataPoint {
    pub time_unix_nano: u64,
    pub labels: Labels,
    pub count: u64,
    pub sum: NumberValue,
    /// Ascending upper bounds of every bucket but the last.
    pub explicit_bounds: Vec<f64>,
    /// Either empty or exactly one longer than `explicit_bounds`.
    pub bucket_counts: Vec<u64>,
}

impl HistogramDataPoint {
    /// Whether the bucket counts line up with the bounds.
    pub fn has_valid_buckets(&self) -> bool {
        self.bucket_counts.is_empty() || self.bucket_counts.len() == self.explicit_bounds.len() + 1
    }
}

/// The shape of a metric, with its points.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricData {
    Gauge {
        data_points: Vec<NumberDataPoint>,
    },
    Sum {
        is_monotonic: bool,
        temporality: Temporality,
        data_points: Vec<NumberDataPoint>,
    },
    Histogram {
        temporality: Temporality,
        data_points: Vec<HistogramDataPoint>,
    },
}

impl MetricData {
    /// Number of input data points, whatever the shape.
    pub fn data_point_count(&self) -> usize {
        match self {
            MetricData::Gauge { data_points } | MetricData::Sum { data_points, .. } => {
                data_points.len()
            }
            MetricData::Histogram { data_points, .. } => data_points.len(),
        }
    }
}

/// A named metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub name: String,
    /// `None` when the metric carries no data in a supported shape.
    pub data: Option<MetricData>,
}

/// Metrics reported by one instrumentation scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeMetrics {
    pub scope_name: String,
    pub scope_version: String,
    pub metrics: Vec<Metric>,
}

/// All metrics reported by one resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceMetrics {
    pub resource: Resource,
    pub scope_metrics: Vec<ScopeMetrics>,
}

impl ResourceMetrics {
    /// Iterates every metric across all scopes.
    pub fn metrics(&self) -> impl Iterator<Item = &Metric> {
        self.scope_metrics.iter().flat_map(|s| s.metrics.iter())
    }
}
