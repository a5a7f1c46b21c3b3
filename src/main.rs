use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, warn};

use imgprobe::{Dimensions, ImageFormat, OutputMode, ProbeOptions, probe_path_with};

#[derive(Parser)]
#[command(name = "imgprobe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Print image dimensions read from file headers", long_about = None)]
struct Cli {
    /// Image files to inspect
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Print one JSON object per file
    #[arg(long)]
    json: bool,

    /// Read through a memory map instead of positioned file reads
    #[arg(long)]
    mmap: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

impl Cli {
    fn options(&self) -> ProbeOptions {
        let output = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };
        let options = ProbeOptions::new().with_output(output);
        if self.mmap { options.with_mmap() } else { options }
    }

    fn log_level(&self) -> Level {
        if self.debug {
            Level::DEBUG
        } else if self.verbose {
            Level::INFO
        } else {
            Level::WARN
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    path: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    #[serde(flatten)]
    dimensions: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Probes every path, returning whether all of them succeeded.
fn run(cli: &Cli) -> Result<bool> {
    let options = cli.options();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut all_ok = true;

    for path in &cli.paths {
        let result = probe_path_with(path, &options);
        if let Err(e) = &result {
            warn!(path = %path.display(), error = %e, "probe failed");
            all_ok = false;
        }
        write_result(&mut out, options.output, path, result)
            .with_context(|| format!("Failed to write result for {}", path.display()))?;
    }

    out.flush().context("Failed to flush output")?;
    Ok(all_ok)
}

fn write_result(
    out: &mut impl Write,
    mode: OutputMode,
    path: &Path,
    result: imgprobe::Result<(ImageFormat, Dimensions)>,
) -> Result<()> {
    match mode {
        OutputMode::Text => match result {
            Ok((format, dims)) => writeln!(out, "{}: {} {}", path.display(), format, dims)?,
            Err(e) => writeln!(out, "{}: error: {}", path.display(), e)?,
        },
        OutputMode::Json => {
            let report = match result {
                Ok((format, dims)) => Report {
                    path,
                    format: Some(format.name()),
                    dimensions: Some(dims),
                    error: None,
                },
                Err(e) => Report {
                    path,
                    format: None,
                    dimensions: None,
                    error: Some(e.to_string()),
                },
            };
            serde_json::to_writer(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
