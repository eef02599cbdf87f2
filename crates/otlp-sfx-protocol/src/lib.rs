//! SignalFx datapoint wire model.
//!
//! Message definitions compatible with the SignalFx protobuf ingest format
//! (`com.signalfx.metrics.protobuf`). Every point is a single metric name, a
//! single value and a flat list of dimensions.

use serde::{Serialize, Serializer};

/// Kind of value a datapoint reports.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration, Serialize,
)]
#[repr(i32)]
pub enum MetricType {
    /// Numerical: periodic instantaneous measurement of some state.
    Gauge = 0,
    /// Numerical: count of occurrences since the last report.
    Counter = 1,
    /// String: used for non-continuous quantities.
    Enum = 2,
    /// Numerical: tally of occurrences over all time.
    CumulativeCounter = 3,
}

impl MetricType {
    /// Name of the metric type as it appears in the SignalFx API.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Gauge => "GAUGE",
            MetricType::Counter => "COUNTER",
            MetricType::Enum => "ENUM",
            MetricType::CumulativeCounter => "CUMULATIVE_COUNTER",
        }
    }
}

/// A single value.  Exactly one of the variants is set.
#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct Datum {
    #[prost(oneof = "datum::Value", tags = "1, 2, 3")]
    #[serde(flatten)]
    pub value: Option<datum::Value>,
}

pub mod datum {
    use serde::Serialize;

    #[derive(Clone, PartialEq, ::prost::Oneof, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub enum Value {
        #[prost(string, tag = "1")]
        StrValue(String),
        #[prost(double, tag = "2")]
        DoubleValue(f64),
        #[prost(int64, tag = "3")]
        IntValue(i64),
    }
}

impl Datum {
    pub fn int(v: i64) -> Datum {
        Datum {
            value: Some(datum::Value::IntValue(v)),
        }
    }

    pub fn double(v: f64) -> Datum {
        Datum {
            value: Some(datum::Value::DoubleValue(v)),
        }
    }

    /// Returns the integer value, if this datum holds one.
    pub fn as_int(&self) -> Option<i64> {
        match self.value {
            Some(datum::Value::IntValue(v)) => Some(v),
            _ => None,
        }
    }

    /// Returns the floating point value, if this datum holds one.
    pub fn as_double(&self) -> Option<f64> {
        match self.value {
            Some(datum::Value::DoubleValue(v)) => Some(v),
            _ => None,
        }
    }
}

/// A key/value pair attached to a datapoint.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message, Serialize)]
pub struct Dimension {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

impl Dimension {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Dimension {
        Dimension {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A flat SignalFx datapoint.
#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[prost(string, tag = "2")]
    pub metric: String,
    /// Milliseconds since the unix epoch.
    #[prost(int64, tag = "3")]
    pub timestamp: i64,
    #[prost(message, optional, tag = "4")]
    pub value: Option<Datum>,
    #[prost(enumeration = "MetricType", tag = "5")]
    #[serde(serialize_with = "serialize_metric_type")]
    pub metric_type: i32,
    #[prost(message, repeated, tag = "6")]
    pub dimensions: Vec<Dimension>,
}

impl DataPoint {
    /// Looks up the value of the last dimension with the given key.
    pub fn dimension(&self, key: &str) -> Option<&str> {
        self.dimensions
            .iter()
            .rev()
            .find(|d| d.key == key)
            .map(|d| d.value.as_str())
    }
}

/// The body of a datapoint ingest request.
#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct DataPointUploadMessage {
    #[prost(message, repeated, tag = "1")]
    pub datapoints: Vec<DataPoint>,
}

fn serialize_metric_type<S: Serializer>(value: &i32, s: S) -> Result<S::Ok, S::Error> {
    match MetricType::try_from(*value) {
        Ok(metric_type) => s.serialize_str(metric_type.as_str()),
        Err(_) => s.serialize_i32(*value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    fn sample_point() -> DataPoint {
        let mut dp = DataPoint {
            metric: "requests_total".to_owned(),
            timestamp: 1000,
            value: Some(Datum::int(42)),
            dimensions: vec![Dimension::new("path", "/a")],
            ..Default::default()
        };
        dp.set_metric_type(MetricType::CumulativeCounter);
        dp
    }

    #[test]
    fn test_metric_type_accessors() {
        let dp = sample_point();
        assert_eq!(dp.metric_type(), MetricType::CumulativeCounter);
        assert_eq!(dp.metric_type, 3);
        assert_eq!(DataPoint::default().metric_type(), MetricType::Gauge);
    }

    #[test]
    fn test_upload_message_decodes_what_it_encodes() {
        let msg = DataPointUploadMessage {
            datapoints: vec![sample_point()],
        };
        let bytes = msg.encode_to_vec();
        let decoded = DataPointUploadMessage::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(decoded.datapoints[0].value.as_ref().unwrap().as_int(), Some(42));
    }

    #[test]
    fn test_datum_kinds_are_exclusive() {
        let int = Datum::int(7);
        assert_eq!(int.as_int(), Some(7));
        assert_eq!(int.as_double(), None);
        let double = Datum::double(0.5);
        assert_eq!(double.as_int(), None);
        assert_eq!(double.as_double(), Some(0.5));
    }

    #[test]
    fn test_dimension_lookup_prefers_last() {
        let mut dp = sample_point();
        dp.dimensions.push(Dimension::new("path", "/b"));
        assert_eq!(dp.dimension("path"), Some("/b"));
        assert_eq!(dp.dimension("missing"), None);
    }

    #[test]
    fn test_json_uses_metric_type_names() {
        let json = serde_json::to_value(sample_point()).unwrap();
        assert_eq!(json["metricType"], "CUMULATIVE_COUNTER");
        assert_eq!(json["metric"], "requests_total");
        assert_eq!(json["value"], serde_json::json!({ "intValue": 42 }));
        assert_eq!(json["dimensions"][0]["key"], "path");
        assert!(json.get("source").is_none());
    }
}
