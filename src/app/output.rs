use crate::app::models::BundleResult;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
}

/// Receives the finished bundle.
pub trait OutputSink {
    fn deliver(&mut self, text: &str) -> Result<()>;
}

/// User-facing reporting of summaries and "nothing to do" conditions.
pub trait Notifier {
    fn notify(&mut self, message: &str, level: Level);
}

pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn deliver(&mut self, text: &str) -> Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())
            .and_then(|_| out.flush())
            .context("Failed to write bundle to stdout")
    }
}

pub struct FileSink {
    pub path: PathBuf,
}

impl OutputSink for FileSink {
    fn deliver(&mut self, text: &str) -> Result<()> {
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write bundle to {}", self.path.display()))
    }
}

pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, message: &str, level: Level) {
        match level {
            Level::Info => log::info!("{}", message),
            Level::Warning => log::warn!("{}", message),
        }
    }
}

pub const EMPTY_SELECTION_MESSAGE: &str = "No selection. Pass files or folders to bundle.";
pub const EMPTY_AFTER_FILTERS_MESSAGE: &str = "Nothing to copy after applying filters.";
pub const NOTHING_PRODUCED_MESSAGE: &str = "Nothing copied. Binary files or limit too low.";

/// One-line report of a successful run, parts joined by a middle dot.
pub fn summary(result: &BundleResult) -> String {
    let mut parts = vec![
        format!("Copied {} file(s)", result.accepted_count),
        format!("~{} bytes", result.total_bytes),
    ];
    if result.skipped_binary > 0 {
        parts.push(format!("{} skipped (binary)", result.skipped_binary));
    }
    if result.skipped_excluded > 0 {
        parts.push(format!("{} skipped (filtered)", result.skipped_excluded));
    }
    if result.truncated {
        parts.push("content truncated at limit".to_string());
    }
    parts.join(" · ")
}
