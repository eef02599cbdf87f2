//! Receives OTLP metrics and writes them out as SignalFx datapoints.
//!
//! Export requests are converted with [`otlp_sfx_core::MetricsConverter`], one resource at a
//! time, and the resulting datapoint batches are handed to a writer that emits either
//! length-delimited protobuf `DataPointUploadMessage`s or JSON lines.

mod config;
mod error;
pub mod output;
mod service;

#[cfg(test)]
mod test_utils;

use std::{path::Path, sync::Arc};

pub use config::{CollectorConfig, OutputConfig, OutputFormat, DEFAULT_LISTEN_ADDRESS};
pub use error::Error;
pub use service::SignalFxMetricsService;

use opentelemetry_proto::tonic::collector::metrics::v1::{
    metrics_service_server::MetricsServiceServer, ExportMetricsServiceRequest,
};
use otlp_sfx_core::{model::ResourceMetrics, MetricsConverter, Skipped};
use otlp_sfx_protocol::DataPointUploadMessage;
use prost::Message;
use tokio::sync::mpsc;

/// Number of datapoint batches buffered between the receiver and the writer.
const WRITER_QUEUE_DEPTH: usize = 64;

/// Datapoints and skipped metrics produced from one export request.
#[derive(Debug, Default)]
pub struct RequestConversion {
    pub message: DataPointUploadMessage,
    pub skipped: Vec<Skipped>,
}

/// Converts every resource of an export request, in order.
pub fn convert_request(
    converter: &MetricsConverter,
    request: &ExportMetricsServiceRequest,
) -> RequestConversion {
    let mut result = RequestConversion::default();
    for rm in &request.resource_metrics {
        let conversion = converter.convert(&ResourceMetrics::from(rm));
        result.message.datapoints.extend(conversion.datapoints);
        result.skipped.extend(conversion.skipped);
    }
    result
}

/// Runs the OTLP/gRPC receiver until the server or the datapoint writer stops.
///
/// Fails before listening when the output cannot be opened, and as soon as the
/// writer fails.
pub async fn serve(config: CollectorConfig, converter: MetricsConverter) -> Result<(), Error> {
    let mut out = output::open(&config.output)?;
    let format = config.output.format;
    let (tx, rx) = mpsc::channel(WRITER_QUEUE_DEPTH);
    let mut writer =
        tokio::task::spawn_blocking(move || output::write_datapoints(rx, &mut out, format));

    let service = SignalFxMetricsService::new(Arc::new(converter), tx);
    log::info!(
        "Listening for OTLP metrics on {}",
        config.listen_address
    );
    let server = tonic::transport::Server::builder()
        .add_service(MetricsServiceServer::new(service))
        .serve(config.listen_address);

    let written = tokio::select! {
        result = server => {
            result?;
            None
        }
        result = &mut writer => Some(result??),
    };
    let written = match written {
        Some(written) => {
            log::warn!("Datapoint writer stopped after writing {written} datapoints");
            written
        }
        // The service, and with it the only sender, is gone once the server stops.
        None => writer.await??,
    };
    log::info!("Receiver stopped after writing {written} datapoints");
    Ok(())
}

/// Converts a protobuf encoded `ExportMetricsServiceRequest` file.
///
/// Returns how many metrics were skipped.
pub fn convert_file(
    converter: &MetricsConverter,
    input: &Path,
    output: &OutputConfig,
) -> Result<usize, Error> {
    let bytes = std::fs::read(input)?;
    let request = ExportMetricsServiceRequest::decode(bytes.as_slice())?;
    let conversion = convert_request(converter, &request);
    let mut out = output::open(output)?;
    output::write_message(&mut out, output.format, &conversion.message)?;
    log::info!(
        "Converted {} into {} datapoints",
        input.display(),
        conversion.message.datapoints.len()
    );
    Ok(conversion.skipped.len())
}
