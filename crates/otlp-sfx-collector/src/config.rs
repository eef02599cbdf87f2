//! Configuration for the SignalFx collector.

use std::{net::SocketAddr, path::PathBuf};

/// Default address the OTLP/gRPC receiver listens on.
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:4317";

/// Configuration for the collector.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Address the OTLP/gRPC metrics receiver binds to.
    pub listen_address: SocketAddr,
    pub output: OutputConfig,
}

/// Where and how converted datapoints are written.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// File to write to. Standard output when unset.
    pub path: Option<PathBuf>,
    pub format: OutputFormat,
}

/// Encoding of written datapoint batches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One length-delimited `DataPointUploadMessage` per batch.
    Protobuf,
    /// One JSON `DataPointUploadMessage` per line.
    #[default]
    Json,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            listen_address: SocketAddr::from(([0, 0, 0, 0], 4317)),
            output: OutputConfig::default(),
        }
    }
}
