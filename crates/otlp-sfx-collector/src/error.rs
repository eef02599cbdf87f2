//! Errors for this crate.

use thiserror::Error;

/// An error from the SignalFx collector.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    ProtobufDecodeError(#[from] prost::DecodeError),
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
    #[error(transparent)]
    TonicTransportError(#[from] tonic::transport::Error),
    #[error(transparent)]
    ArgumentError(#[from] clap::Error),
    #[error("The datapoint writer stopped unexpectedly")]
    WriterTaskError(#[from] tokio::task::JoinError),
}
