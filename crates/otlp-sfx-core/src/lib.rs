//! Translation of OpenTelemetry metrics into SignalFx datapoints.
//!
//! A resource-scoped batch of gauges, sums and histograms is flattened into
//! single-value datapoints with dimensions. Histograms are split into count,
//! sum and per-bucket points, resource attributes become dimensions (with a
//! synthesized cloud identity when possible) and dimension keys are sanitized
//! for the SignalFx ingest API.
//!
//! ```
//! use otlp_sfx_core::{model::ResourceMetrics, MetricsConverter};
//!
//! let converter = MetricsConverter::new(None);
//! let conversion = converter.convert(&ResourceMetrics::default());
//! assert!(conversion.datapoints.is_empty());
//! ```

mod convert;
mod dimensions;
mod error;
pub mod model;
mod otlp;
mod sanitize;
mod translator;

#[cfg(test)]
mod test_utils;

// Exposes the conversion entry points.
pub use convert::{
    format_bound, metric_type_for, Conversion, MetricsConverter, UPPER_BOUND_DIMENSION,
};
// Exposes the resource dimension rules.
pub use dimensions::{
    resource_dimensions, ATTRIBUTE_ACCESS_TOKEN, ATTRIBUTE_CLOUD_ACCOUNT_ID,
    ATTRIBUTE_CLOUD_PROVIDER, ATTRIBUTE_CLOUD_REGION, ATTRIBUTE_HOST_ID,
    AWS_UNIQUE_ID_DIMENSION, GCP_ID_DIMENSION,
};
pub use error::{SkipReason, Skipped};
pub use sanitize::{filter_key_chars, sanitize_datapoint_dimensions};
pub use translator::{DiagnosticSink, LogSink, MetricTranslator};

// The wire model the converter produces.
pub use otlp_sfx_protocol as protocol;
