use std::io::{self as std_io, Write};
use std::time::Duration;

use clap::Parser;
use tokio_serial::SerialStream;
use tokio_util::codec::FramedRead;
use tracing::info;
use tracing_subscriber;

use liftlink::{open, report, DeviceConfig, FrameCodec, TraceCodec};

/// Parses and validates the given read timeout.
fn read_timeout(s: &str) -> Result<Duration, String> {
    let secs = s
        .parse::<u64>()
        .map_err(|_| format!("invalid value for read timeout"))?;
    let rv = Duration::from_secs(secs);
    if rv.is_zero() {
        return Err(format!("read timeout must be non-zero"));
    }

    Ok(rv)
}

#[derive(Parser)]
#[command(name = "lift-dump")]
#[command(version = "0.1")]
#[command(about = "Dump live traffic between lift and remote", long_about=None)]
struct Args {
    /// Serial device, e.g. /dev/ttyUSB0.
    #[arg(value_name = "DEVICE")]
    device: String,

    /// Fail if no data arrives within this many seconds. Waits indefinitely by default.
    #[arg(short = 't', long = "timeout", value_name = "SECONDS")]
    #[arg(value_parser = read_timeout)]
    timeout: Option<Duration>,

    /// Reassemble and decode frames instead of printing a raw hex trace.
    #[arg(short = 'd', long)]
    decode: bool,
}

async fn dump_trace(port: SerialStream, config: &DeviceConfig) -> anyhow::Result<()> {
    let mut traces = FramedRead::new(port, TraceCodec);
    let stdout = std_io::stdout();

    while let Some(trace) = config.next_item(&mut traces).await? {
        let mut out = stdout.lock();
        out.write_all(trace.as_bytes())?;
        out.flush()?;
    }

    Ok(())
}

async fn dump_frames(port: SerialStream, config: &DeviceConfig) -> anyhow::Result<()> {
    let mut frames = FramedRead::new(port, FrameCodec::new());

    while let Some(frame) = config.next_frame(&mut frames).await? {
        let decoded = frame.decode();
        println!("{}  {}", frame, report::describe(&decoded));
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let config = DeviceConfig::new(&args.device, args.timeout);
    let port = open(&config)?;

    let dump = async {
        if args.decode {
            dump_frames(port, &config).await
        } else {
            dump_trace(port, &config).await
        }
    };

    tokio::select! {
        res = dump => res?,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted");
        }
    }

    println!();

    Ok(())
}
