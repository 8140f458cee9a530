use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use merit_core::{process_file, CalibrationDirectoryResolver, PipelineConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "MERIT instrument calibration pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calibrate raw data files and write the products
    Process(ProcessArgs),
    /// List the calibration artifacts the resolver can see
    Calibrations(CalibrationsArgs),
}

#[derive(Args, Debug)]
struct ProcessArgs {
    /// Raw instrument data files to process
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Directory of calibration artifacts (default: $MERIT_CALIBRATION_DIR)
    #[arg(long)]
    calibration_dir: Option<PathBuf>,

    /// Directory for written products (default: $MERIT_OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CalibrationsArgs {
    /// Directory of calibration artifacts (default: $MERIT_CALIBRATION_DIR)
    #[arg(long)]
    calibration_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Load .env before the filter is built so RUST_LOG from .env is honored.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Process(args) => run_process(args),
        Command::Calibrations(args) => run_calibrations(args),
    }
}

fn run_process(args: ProcessArgs) -> Result<()> {
    let config = PipelineConfig::from_env();
    let calibration_dir = args.calibration_dir.unwrap_or(config.calibration_dir);
    let output_dir = args.output_dir.unwrap_or(config.output_dir);
    let resolver = CalibrationDirectoryResolver::new(calibration_dir);

    for file in &args.files {
        let outputs = process_file(file, &resolver, &output_dir)
            .with_context(|| format!("failed to process {}", file.display()))?;
        for output in outputs {
            println!("{}", output.display());
        }
    }

    info!(files = args.files.len(), "processing complete");
    Ok(())
}

fn run_calibrations(args: CalibrationsArgs) -> Result<()> {
    let config = PipelineConfig::from_env();
    let calibration_dir = args.calibration_dir.unwrap_or(config.calibration_dir);
    let resolver = CalibrationDirectoryResolver::new(&calibration_dir);

    let candidates = resolver
        .candidates()
        .with_context(|| format!("failed to scan {}", calibration_dir.display()))?;

    if candidates.is_empty() {
        println!("no calibration artifacts in {}", calibration_dir.display());
        return Ok(());
    }

    for candidate in candidates {
        let meta = &candidate.artifact.calibration;
        let until = meta
            .valid_until
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "open".to_string());
        println!(
            "{}  {} {} v{:02}  {} .. {}",
            candidate.path.display(),
            meta.instrument,
            meta.applies_to_level,
            meta.version,
            meta.valid_from.to_rfc3339(),
            until
        );
    }

    Ok(())
}
