//! Headless front-end for OCT A-scan attenuation measurements.
//!
//! Loads a scan file, reduces it to the summed depth profile, and replays
//! ROI ranges through the same fit tracker the GUI uses.
#![allow(clippy::uninlined_format_args)]

use clap::{Parser, Subcommand};
use octascan_core::{axis, AxisMapping, ClickOutcome, RoiFitTracker, SummaryRow};
use octascan_io::ScanFile;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error: {0}")]
    ScanIo(#[from] octascan_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] octascan_core::Error),

    #[error("Invalid ROI argument: {0} (expected start:end in µm)")]
    Roi(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// OCT A-scan attenuation measurement tool.
#[derive(Parser)]
#[command(name = "octascan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print scan dimensions and profile statistics
    Info {
        /// Input scan file (dimensions encoded in the name)
        input: PathBuf,
    },

    /// Print the summed depth profile (A-scan)
    Ascan {
        /// Input scan file
        input: PathBuf,

        /// Full physical depth range of the scan in µm
        #[arg(long, default_value_t = axis::DEFAULT_DEPTH_RANGE_UM)]
        depth_um: f64,
    },

    /// Fit attenuation slopes over one or more depth ranges
    Fit {
        /// Input scan file
        input: PathBuf,

        /// ROI depth range in µm, as `start:end` (repeatable)
        #[arg(short, long = "roi", required = true)]
        roi: Vec<String>,

        /// Full physical depth range of the scan in µm
        #[arg(long, default_value_t = axis::DEFAULT_DEPTH_RANGE_UM)]
        depth_um: f64,

        /// Emit the measurement table as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Info { input } => info(&input),
        Commands::Ascan { input, depth_um } => ascan(&input, depth_um),
        Commands::Fit {
            input,
            roi,
            depth_um,
            json,
        } => fit(&input, &roi, depth_um, json),
    }
}

fn info(input: &Path) -> Result<()> {
    let scan = ScanFile::open(input)?;
    let d = scan.descriptor();
    println!("File:    {}", input.display());
    println!("Size:    {} bytes ({} samples)", scan.len(), scan.sample_count());
    println!("X:       {} lateral samples", d.x);
    println!("Frames:  {}", d.frames);
    println!("Z:       {} depth samples", d.z);

    let (_, a_scan) = scan.read_volume()?.reduce();
    let min = a_scan.iter().copied().fold(f64::INFINITY, f64::min);
    let max = a_scan.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    println!("A-scan:  min {min:.4}, max {max:.4}");
    Ok(())
}

fn ascan(input: &Path, depth_um: f64) -> Result<()> {
    let scan = ScanFile::open(input)?;
    let (_, a_scan) = scan.read_volume()?.reduce();
    let mapping = AxisMapping::new(depth_um, scan.descriptor().z);
    println!("index\tdepth_um\tintensity");
    for (i, value) in a_scan.iter().enumerate() {
        println!("{i}\t{:.2}\t{value:.6}", mapping.physical_of(i));
    }
    Ok(())
}

fn fit(input: &Path, rois: &[String], depth_um: f64, json: bool) -> Result<()> {
    let scan = ScanFile::open(input)?;
    let (_, a_scan) = scan.read_volume()?.reduce();
    let mapping = AxisMapping::new(depth_um, scan.descriptor().z);

    let mut tracker = RoiFitTracker::new();
    tracker.attach_profile(a_scan, mapping);

    for roi in rois {
        let (start, end) = parse_roi(roi)?;
        tracker.register_click(start)?;
        match tracker.register_click(end)? {
            ClickOutcome::Fitted(_) => {}
            ClickOutcome::Pending => unreachable!("second click always closes the ROI"),
        }
    }

    let rows = tracker.summarize();
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print_table(&rows);
    }
    Ok(())
}

fn print_table(rows: &[SummaryRow]) {
    println!("{:<12} {:>16}", "Measurement", "Attenuation coef");
    for row in rows {
        match row {
            SummaryRow::Measurement { seq, slope } => {
                println!("{seq:<12} {slope:>16.2}");
            }
            SummaryRow::Average { mean, std_dev } => {
                println!("{:<12} {:>16}", "Average", format!("{mean:.2} ± {std_dev:.2}"));
            }
        }
    }
}

/// Parses a `start:end` physical-depth ROI argument.
fn parse_roi(arg: &str) -> Result<(f64, f64)> {
    let (start, end) = arg
        .split_once(':')
        .ok_or_else(|| CliError::Roi(arg.to_string()))?;
    let start: f64 = start
        .trim()
        .parse()
        .map_err(|_| CliError::Roi(arg.to_string()))?;
    let end: f64 = end
        .trim()
        .parse()
        .map_err(|_| CliError::Roi(arg.to_string()))?;
    Ok((start, end))
}
