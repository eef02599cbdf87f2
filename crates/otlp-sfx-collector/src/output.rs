//! Writing converted datapoints.

use std::{
    fs::File,
    io::{BufWriter, Write},
};

use otlp_sfx_protocol::DataPointUploadMessage;
use prost::Message;
use tokio::sync::mpsc;

use crate::{Error, OutputConfig, OutputFormat};

/// Opens the configured destination, standard output when no path is set.
pub fn open(config: &OutputConfig) -> Result<Box<dyn Write + Send>, Error> {
    Ok(match &config.path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout()),
    })
}

/// Writes a single batch and flushes it.
pub fn write_message<W: Write + ?Sized>(
    out: &mut W,
    format: OutputFormat,
    message: &DataPointUploadMessage,
) -> Result<(), Error> {
    match format {
        OutputFormat::Protobuf => out.write_all(&message.encode_length_delimited_to_vec())?,
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, message)?;
            out.write_all(b"\n")?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Writes batches until every sender is dropped. Blocks the calling thread.
///
/// Returns the number of datapoints written.
pub fn write_datapoints<W: Write + ?Sized>(
    mut batches: mpsc::Receiver<DataPointUploadMessage>,
    out: &mut W,
    format: OutputFormat,
) -> Result<usize, Error> {
    let mut written = 0;
    while let Some(message) = batches.blocking_recv() {
        write_message(out, format, &message)?;
        written += message.datapoints.len();
        log::debug!("Wrote batch of {} datapoints", message.datapoints.len());
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use otlp_sfx_protocol::{DataPoint, Datum, Dimension, MetricType};

    fn message(metrics: &[&str]) -> DataPointUploadMessage {
        DataPointUploadMessage {
            datapoints: metrics
                .iter()
                .map(|m| {
                    let mut dp = DataPoint {
                        metric: (*m).to_owned(),
                        timestamp: 1_000,
                        value: Some(Datum::int(1)),
                        dimensions: vec![Dimension::new("host", "a")],
                        ..Default::default()
                    };
                    dp.set_metric_type(MetricType::Counter);
                    dp
                })
                .collect(),
        }
    }

    #[test]
    fn test_json_lines() -> Result<(), Error> {
        let mut out = Vec::new();
        write_message(&mut out, OutputFormat::Json, &message(&["a"]))?;
        write_message(&mut out, OutputFormat::Json, &message(&["b", "c"]))?;
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()?;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["datapoints"][0]["metric"], "a");
        assert_eq!(lines[0]["datapoints"][0]["metricType"], "COUNTER");
        assert_eq!(lines[0]["datapoints"][0]["value"]["intValue"], 1);
        assert_eq!(lines[1]["datapoints"].as_array().map(Vec::len), Some(2));
        Ok(())
    }

    #[test]
    fn test_protobuf_is_length_delimited() -> Result<(), Error> {
        let mut out = Vec::new();
        write_message(&mut out, OutputFormat::Protobuf, &message(&["a"]))?;
        write_message(&mut out, OutputFormat::Protobuf, &message(&["b", "c"]))?;
        let mut buf = out.as_slice();
        let first = DataPointUploadMessage::decode_length_delimited(&mut buf)?;
        let second = DataPointUploadMessage::decode_length_delimited(&mut buf)?;
        assert!(buf.is_empty());
        assert_eq!(first, message(&["a"]));
        assert_eq!(second.datapoints.len(), 2);
        Ok(())
    }

    #[test]
    fn test_write_datapoints_drains_channel() -> Result<(), Error> {
        let (tx, rx) = mpsc::channel(4);
        tx.try_send(message(&["a"])).expect("queue has room");
        tx.try_send(message(&["b", "c"])).expect("queue has room");
        drop(tx);
        let mut out = Vec::new();
        let written = write_datapoints(rx, &mut out, OutputFormat::Json)?;
        assert_eq!(written, 3);
        assert_eq!(String::from_utf8_lossy(&out).lines().count(), 2);
        Ok(())
    }

    #[test]
    fn test_open_file() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let config = OutputConfig {
            path: Some(dir.path().join("points.json")),
            format: OutputFormat::Json,
        };
        {
            let mut out = open(&config)?;
            write_message(&mut out, config.format, &message(&["a"]))?;
        }
        let text = std::fs::read_to_string(dir.path().join("points.json"))?;
        assert!(text.ends_with('\n'));
        Ok(())
    }
}
