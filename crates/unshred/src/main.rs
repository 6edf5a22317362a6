//! unshred: reassemble an image from shuffled horizontal strip files.
//!
//! Loads strip images (BMP or PNG), orders them by matching the bottom
//! row of each strip against the top row of the others, stacks them,
//! and writes the result.
//!
//! # Usage
//!
//! ```text
//! # images/image_strip_0.bmp .. images/image_strip_15.bmp -> final_reconstructed.bmp
//! unshred
//!
//! # explicit strips, PNG output, per-stage diagnostics
//! unshred a.bmp b.bmp c.bmp -o out.png --report
//!
//! # machine-readable timings and the chosen order
//! unshred --dir shreds --count 8 --json
//! unshred --dir shreds --count 8 --order
//! ```
//!
//! Set `RUST_LOG=debug` to see the anchor choice and ordering decisions.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use unshred_core::{ReconstructConfig, ReconstructError};
use unshred_core::diagnostics::{Clock, reconstruct_with_diagnostics};
use unshred_export::OutputFormat;

/// Reassemble an image from horizontal strips of unknown order.
///
/// Strips are taken from the positional arguments, or, when none are
/// given, generated as `<DIR>/<PREFIX><i>.<EXTENSION>` for
/// `i` in `0..COUNT`.
#[derive(Parser)]
#[command(name = "unshred", version)]
struct Cli {
    /// Strip image paths (BMP, PNG), in any order.
    strips: Vec<PathBuf>,

    /// Directory holding numbered strip files.
    #[arg(long, default_value = "images")]
    dir: PathBuf,

    /// File name prefix of numbered strip files.
    #[arg(long, default_value = "image_strip_")]
    prefix: String,

    /// Number of numbered strip files.
    #[arg(long, default_value_t = 16, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    count: usize,

    /// Extension of numbered strip files.
    #[arg(long, default_value = "bmp")]
    extension: String,

    /// Output image path.
    #[arg(short, long, default_value = "final_reconstructed.bmp")]
    output: PathBuf,

    /// Output format. Inferred from the output extension when omitted.
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Skip the equal-width check before ordering.
    #[arg(long)]
    no_width_check: bool,

    /// Full reconstruction config as a JSON string.
    ///
    /// When provided, `--no-width-check` is ignored.
    /// The JSON must be a valid `ReconstructConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,

    /// Print the per-stage diagnostics report.
    #[arg(long)]
    report: bool,

    /// Print diagnostics as JSON on stdout instead of the report.
    #[arg(long)]
    json: bool,

    /// Print the chosen order, top to bottom, one strip path per line.
    #[arg(long)]
    order: bool,
}

/// Output format selection.
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Windows bitmap.
    Bmp,
    /// Portable Network Graphics.
    Png,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Bmp => Self::Bmp,
            Format::Png => Self::Png,
        }
    }
}

/// Build a [`ReconstructConfig`] from CLI arguments.
fn config_from_cli(cli: &Cli) -> Result<ReconstructConfig, ReconstructError> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json)
            .map_err(|e| ReconstructError::InvalidConfig(format!("--config-json: {e}")));
    }

    Ok(ReconstructConfig {
        check_widths: !cli.no_width_check,
        ..ReconstructConfig::default()
    })
}

/// Strip paths in input order.
fn strip_paths(cli: &Cli) -> Vec<PathBuf> {
    if !cli.strips.is_empty() {
        return cli.strips.clone();
    }
    (0..cli.count)
        .map(|i| {
            cli.dir
                .join(format!("{}{i}.{}", cli.prefix, cli.extension))
        })
        .collect()
}

/// Resolve the output format from `--format` or the output extension.
fn output_format(cli: &Cli) -> Result<OutputFormat, String> {
    if let Some(f) = cli.format {
        return Ok(f.into());
    }
    OutputFormat::from_path(&cli.output).ok_or_else(|| {
        format!(
            "cannot infer output format from {}; pass --format",
            cli.output.display()
        )
    })
}

/// Output path, with the format's extension added when it has none.
fn output_path(cli: &Cli, format: OutputFormat) -> PathBuf {
    if cli.output.extension().is_some() {
        cli.output.clone()
    } else {
        cli.output.with_extension(format.extension())
    }
}

fn read_all(paths: &[PathBuf]) -> Result<Vec<Vec<u8>>, String> {
    paths
        .iter()
        .map(|p| std::fs::read(p).map_err(|e| format!("Error reading {}: {e}", p.display())))
        .collect()
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = config_from_cli(cli).map_err(|e| e.to_string())?;
    let format = output_format(cli)?;
    let output = output_path(cli, format);
    let paths = strip_paths(cli);

    eprintln!("Reading {} strips", paths.len());
    let sources = read_all(&paths)?;

    let (result, diagnostics) = reconstruct_with_diagnostics(&sources, &config, &StdClock)
        .map_err(|e| match e {
            ReconstructError::ImageDecode { index, .. }
            | ReconstructError::EmptyStrip { index }
            | ReconstructError::DimensionMismatch { index, .. } => {
                format!("Reconstruction error ({}): {e}", display_at(&paths, index))
            }
            other => format!("Reconstruction error: {other}"),
        })?;

    if cli.json {
        let json = serde_json::to_string_pretty(&diagnostics)
            .map_err(|e| format!("Error serializing diagnostics: {e}"))?;
        println!("{json}");
    } else if cli.report {
        println!("{}", diagnostics.report());
    }

    if cli.order {
        for &i in &result.order {
            println!("{}", display_at(&paths, i));
        }
    }
    if !result.is_complete() {
        log::warn!("{} strips could not be placed", result.dropped.len());
        for &i in &result.dropped {
            eprintln!("  dropped: {}", display_at(&paths, i));
        }
    }

    let bytes = unshred_export::encode(&result.image, format).map_err(|e| e.to_string())?;
    std::fs::write(&output, &bytes)
        .map_err(|e| format!("Error writing {}: {e}", output.display()))?;

    eprintln!(
        "{}x{} {format} written to {} ({} bytes)",
        result.dimensions.width,
        result.dimensions.height,
        output.display(),
        bytes.len(),
    );
    Ok(())
}

fn display_at(paths: &[PathBuf], index: usize) -> String {
    paths
        .get(index)
        .map_or_else(|| format!("strip {index}"), |p| p.display().to_string())
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}
