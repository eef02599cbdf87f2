//! Seams to the collaborators around the converter.

use otlp_sfx_protocol::DataPoint;

use crate::Skipped;

/// Receives diagnostics produced while converting a batch.
pub trait DiagnosticSink {
    /// A metric, or part of one, could not be converted.
    fn skipped(&self, skipped: &Skipped);

    /// Free-form warning, used by translators.
    fn warn(&self, message: &str);
}

/// Sink that forwards everything to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn skipped(&self, skipped: &Skipped) {
        log::debug!("Skipping metric {}: {}", skipped.metric, skipped.reason);
    }

    fn warn(&self, message: &str) {
        log::warn!("{message}");
    }
}

/// Rewrites a converted batch before it leaves the converter.
///
/// Called with the complete, sanitized batch of one conversion. Implementations
/// may drop, rename or redimension points. They are shared across concurrent
/// conversions and must not depend on per-call mutable state.
pub trait MetricTranslator: Send + Sync {
    fn translate_datapoints(
        &self,
        datapoints: Vec<DataPoint>,
        sink: &dyn DiagnosticSink,
    ) -> Vec<DataPoint>;
}

impl<F> MetricTranslator for F
where
    F: Fn(Vec<DataPoint>, &dyn DiagnosticSink) -> Vec<DataPoint> + Send + Sync,
{
    fn translate_datapoints(
        &self,
        datapoints: Vec<DataPoint>,
        sink: &dyn DiagnosticSink,
    ) -> Vec<DataPoint> {
        self(datapoints, sink)
    }
}
