use std::{net::SocketAddr, path::PathBuf};

use clap::{Parser, Subcommand};
use env_logger::Env;
use otlp_sfx_collector::{
    convert_file, serve, CollectorConfig, Error, OutputConfig, OutputFormat,
    DEFAULT_LISTEN_ADDRESS,
};
use otlp_sfx_core::MetricsConverter;

/// Translates OTLP metrics into SignalFx datapoints.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Receives OTLP/gRPC metric exports and writes out their datapoints.
    Serve {
        /// Address to listen on for OTLP/gRPC.
        #[arg(
            short,
            long,
            env = "OTLP_SFX_LISTEN_ADDRESS",
            default_value = DEFAULT_LISTEN_ADDRESS
        )]
        listen: SocketAddr,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Converts a protobuf encoded ExportMetricsServiceRequest file.
    Convert {
        /// File holding the export request.
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// File to write datapoints to, standard output if unset.
    #[arg(short, long, env = "OTLP_SFX_OUTPUT")]
    output: Option<PathBuf>,

    /// Encoding of written datapoint batches.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

impl From<OutputArgs> for OutputConfig {
    fn from(args: OutputArgs) -> Self {
        OutputConfig {
            path: args.output,
            format: args.format,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Logs go to stderr, so they never mix with datapoints written to stdout.
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        // --help and --version.
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => return Err(e.into()),
    };
    let converter = MetricsConverter::new(None);
    match args.command {
        Command::Serve { listen, output } => {
            let config = CollectorConfig {
                listen_address: listen,
                output: output.into(),
            };
            serve(config, converter).await
        }
        Command::Convert { input, output } => {
            let skipped = convert_file(&converter, &input, &output.into())?;
            if skipped > 0 {
                log::warn!("{skipped} metrics were skipped");
            }
            Ok(())
        }
    }
}
