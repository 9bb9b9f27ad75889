// Declare modules
pub mod bundler;
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod fs;
pub mod language;
pub mod models;
pub mod output;
pub mod scanner;
pub mod sniffer;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::path::{Path, PathBuf};

use self::cli::Cli;
use self::config::resolve_config;
use self::error::ScanError;
use self::fs::{FileSystem, LocalFs};
use self::models::{BundleOutcome, FileEntry, RuntimeConfig};
use self::output::{FileSink, Level, LogNotifier, Notifier, OutputSink, StdoutSink};
use self::scanner::Scanner;

/// Runs the whole pipeline for one selection: flatten, filter, read, accumulate.
///
/// Files are read in discovery order; `bundler::accumulate` owns the path ordering.
pub fn bundle<F: FileSystem + ?Sized>(
    fs: &F,
    root: &Path,
    selection: &[PathBuf],
    config: &RuntimeConfig,
) -> Result<BundleOutcome, ScanError> {
    if selection.is_empty() {
        return Ok(BundleOutcome::EmptySelection);
    }

    let scanner = Scanner::new(fs, root.to_path_buf(), config)?;
    let files = scanner.filter(scanner.flatten(selection)?);
    if files.is_empty() {
        return Ok(BundleOutcome::EmptyAfterFilters(Default::default()));
    }

    let entries: Vec<FileEntry> = files.iter().map(|f| scanner.load(f)).collect();
    let result = bundler::accumulate(&entries, config);
    Ok(bundler::into_outcome(result))
}

/// Hands the outcome to the sink and reports it. Only a successful bundle reaches the sink.
pub fn deliver(
    outcome: BundleOutcome,
    sink: &mut dyn OutputSink,
    notifier: &mut dyn Notifier,
) -> Result<()> {
    match outcome {
        BundleOutcome::Bundled(result) => {
            sink.deliver(&result.text)?;
            notifier.notify(&output::summary(&result), Level::Info);
        }
        BundleOutcome::EmptySelection => {
            notifier.notify(output::EMPTY_SELECTION_MESSAGE, Level::Warning);
        }
        BundleOutcome::EmptyAfterFilters(result) => {
            log::debug!(
                "{} binary, {} excluded",
                result.skipped_binary,
                result.skipped_excluded
            );
            notifier.notify(output::EMPTY_AFTER_FILTERS_MESSAGE, Level::Warning);
        }
        BundleOutcome::NothingProduced(result) => {
            log::debug!("Budget of {} bytes exhausted", result.total_bytes);
            notifier.notify(output::NOTHING_PRODUCED_MESSAGE, Level::Warning);
        }
    }
    Ok(())
}

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Identify Base Root & Project Name
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let root: PathBuf = match &args.root {
        Some(dir) => current_dir.join(dir).components().collect(),
        None => current_dir.clone(),
    };
    // Simple heuristic: name of the root folder
    let project_name = root.file_name().and_then(|n| n.to_str());

    // 3. Resolve Configuration
    let config = resolve_config(&args, project_name)?;
    log::debug!("Resolved configuration: {:?}", config);

    // 4. Bundle
    // Rebuilding from components drops interior `.` segments
    let selection: Vec<PathBuf> = args
        .paths
        .iter()
        .map(|p| current_dir.join(p).components().collect())
        .collect();
    let outcome = bundle(&LocalFs, &root, &selection, &config).context("Failed to collect files")?;

    // 5. Deliver
    let mut sink: Box<dyn OutputSink> = match &args.output {
        Some(path) => Box::new(FileSink { path: path.clone() }),
        None => Box::new(StdoutSink),
    };
    deliver(outcome, sink.as_mut(), &mut LogNotifier)
}
