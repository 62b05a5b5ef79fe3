//! Command-line interface module for foldersort.
//!
//! This module handles argument parsing, logging setup, configuration
//! loading and hands the actual work to the [`Sorter`].

use crate::config::SortConfig;
use crate::output::OutputFormatter;
use crate::sorter::{SortOptions, SortResult, Sorter};
use clap::Parser;
use std::path::PathBuf;

/// Sort a directory into images, video, audio, documents, archives and other.
#[derive(Debug, Parser)]
#[command(name = "foldersort", version, about)]
pub struct Args {
    /// Directory to sort.
    pub path: PathBuf,

    /// Show what would happen without moving anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Configuration file (defaults to .foldersortrc.toml, then ~/.config/foldersort/config.toml).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the run report as JSON instead of the summary table.
    #[arg(long)]
    pub json: bool,

    /// Only print the summary (or JSON report).
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    fn sort_options(&self) -> SortOptions {
        let quiet = self.quiet || self.json;
        SortOptions {
            dry_run: self.dry_run,
            quiet,
            progress: !quiet,
        }
    }
}

/// Initializes `env_logger`, honoring `RUST_LOG` unless `-v` was given.
pub fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
        }
    }
    let _ = builder.try_init();
}

/// Runs a sort as described by `args`.
///
/// # Errors
///
/// Returns an error for an invalid configuration or an unusable root
/// directory. Per-file failures are part of the printed report.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use foldersort::cli::{Args, run};
///
/// let args = Args::parse_from(["foldersort", "/path/to/Downloads", "--dry-run"]);
/// if let Err(e) = run(&args) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run(args: &Args) -> SortResult<()> {
    let config = SortConfig::load(args.config.as_deref())?;
    let registry = config.registry()?;
    let filters = config.compile_filters()?;

    let sorter = Sorter::new(&registry, &filters, args.sort_options());
    let report = sorter.run(&args.path)?;

    if args.json {
        match report.to_json() {
            Ok(json) => OutputFormatter::plain(&json),
            Err(e) => OutputFormatter::error(&format!("Could not serialize report: {}", e)),
        }
    } else {
        OutputFormatter::summary(&report);
    }

    Ok(())
}
