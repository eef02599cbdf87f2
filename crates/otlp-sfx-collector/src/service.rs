//! OTLP/gRPC metrics service.

use std::sync::Arc;

use itertools::Itertools;
use opentelemetry_proto::tonic::collector::metrics::v1::{
    metrics_service_server::MetricsService, ExportMetricsPartialSuccess,
    ExportMetricsServiceRequest, ExportMetricsServiceResponse,
};
use otlp_sfx_core::MetricsConverter;
use otlp_sfx_protocol::DataPointUploadMessage;
use tokio::sync::mpsc;
use tonic::{Request, Response, Status};

use crate::convert_request;

/// Converts every export it receives and forwards the datapoints to a writer.
pub struct SignalFxMetricsService {
    converter: Arc<MetricsConverter>,
    datapoints: mpsc::Sender<DataPointUploadMessage>,
}

impl SignalFxMetricsService {
    pub fn new(
        converter: Arc<MetricsConverter>,
        datapoints: mpsc::Sender<DataPointUploadMessage>,
    ) -> SignalFxMetricsService {
        SignalFxMetricsService {
            converter,
            datapoints,
        }
    }
}

#[tonic::async_trait]
impl MetricsService for SignalFxMetricsService {
    async fn export(
        &self,
        request: Request<ExportMetricsServiceRequest>,
    ) -> Result<Response<ExportMetricsServiceResponse>, Status> {
        let conversion = convert_request(&self.converter, request.get_ref());
        if !conversion.message.datapoints.is_empty() {
            self.datapoints
                .send(conversion.message)
                .await
                .map_err(|_| Status::unavailable("datapoint writer has shut down"))?;
        }
        // Skips are reported back, the rest of the request was accepted. Skips that
        // lost no whole data point count as warnings.
        let partial_success = if conversion.skipped.is_empty() {
            None
        } else {
            Some(ExportMetricsPartialSuccess {
                rejected_data_points: conversion
                    .skipped
                    .iter()
                    .map(|s| s.dropped_points as i64)
                    .sum(),
                error_message: conversion
                    .skipped
                    .iter()
                    .map(|s| format!("{}: {}", s.metric, s.reason))
                    .join("; "),
            })
        };
        Ok(Response::new(ExportMetricsServiceResponse { partial_success }))
    }
}
