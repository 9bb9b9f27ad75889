use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Bundle files into one fenced, size-bounded text document"
)]
pub struct Cli {
    /// Files and folders to bundle
    pub paths: Vec<PathBuf>,

    /// Use a predefined set of options from presets.toml
    #[arg(long)]
    pub preset: Option<String>,

    /// Base directory that relative paths are computed against
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Hard cap on the total bundle size in bytes (minimum 1024)
    #[arg(long)]
    pub max_bytes: Option<usize>,

    /// Per-file cap for .json files in bytes (minimum 1024)
    #[arg(long)]
    pub max_json_bytes: Option<usize>,

    /// Text placed between blocks; accepts \n, \t and \\ escapes
    #[arg(long)]
    pub separator: Option<String>,

    /// Glob pattern for files to leave out (e.g., '**/*.log'); repeatable
    #[arg(long, action = ArgAction::Append)]
    pub ignore: Option<Vec<String>>,

    /// Keep markdown files in the bundle
    #[arg(long)]
    pub include_markdown: bool,

    /// Emit bare fenced blocks without the name/size/path lines
    #[arg(long)]
    pub no_headers: bool,

    /// Put the name/size/path lines inside the fence
    #[arg(long)]
    pub metadata_inside_fence: bool,

    /// Write the bundle to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}
