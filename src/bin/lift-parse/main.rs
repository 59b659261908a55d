use std::io::{self as std_io, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};
use tracing_subscriber;

use liftlink::{parse_hex_line, report};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Markdown report
    Markdown,
    /// One JSON object per line
    Json,
}

#[derive(Parser)]
#[command(name = "lift-parse")]
#[command(version = "0.1")]
#[command(about = "Decode lift serial captures (one frame per line)", long_about=None)]
struct Args {
    /// Capture file, e.g. lines like `0x55 0xaa 0xa5 0x8c 0x0c 0x00`.
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output format (case insensitive)
    #[arg(value_enum)]
    #[arg(short = 'f', long, ignore_case = true, default_value_t = Format::Markdown)]
    format: Format,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let file = File::open(&args.file)
        .await
        .with_context(|| format!("failed to open {}", args.file.display()))?;
    let mut lines = BufReader::new(file).lines();

    let stdout = std_io::stdout();

    if let Format::Markdown = args.format {
        report::write_markdown_header(&mut stdout.lock(), &args.file.display().to_string())?;
    }

    let mut line_number = 0;
    while let Some(line) = lines
        .next_line()
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?
    {
        line_number += 1;

        let mut out = stdout.lock();
        let frame = match parse_hex_line(&line, line_number) {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(e) => {
                warn!("{}", e);
                match args.format {
                    Format::Markdown => report::write_markdown_parse_error(&mut out, &e)?,
                    Format::Json => report::write_json_parse_error(&mut out, &e)?,
                }
                continue;
            }
        };

        let decoded = frame.decode();
        debug!("line {}: {:?}", line_number, decoded);
        match args.format {
            Format::Markdown => {
                report::write_markdown_frame(&mut out, line_number, &frame, &decoded)?
            }
            Format::Json => report::write_json_frame(&mut out, line_number, &frame, &decoded)?,
        }
    }

    stdout.lock().flush()?;

    Ok(())
}
