use std::path::PathBuf;

pub const DEFAULT_MAX_BYTES: usize = 20_000_000;
pub const DEFAULT_MAX_JSON_BYTES: usize = 200_000;
pub const DEFAULT_SEPARATOR: &str = "\n\n";
pub const MIN_BYTES: usize = 1024;

/// Represents the final configuration after merging presets and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub max_bytes: usize,
    pub max_json_bytes: usize,
    pub separator: String,
    pub ignore_globs: Vec<String>,
    pub exclude_markdown: bool,
    pub include_headers: bool,
    pub metadata_inside_fence: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            max_json_bytes: DEFAULT_MAX_JSON_BYTES,
            separator: DEFAULT_SEPARATOR.to_string(),
            ignore_globs: Vec::new(),
            exclude_markdown: true,
            include_headers: true,
            metadata_inside_fence: false,
        }
    }
}

impl RuntimeConfig {
    /// Applies the floors and fallbacks every invocation relies on.
    pub fn normalized(mut self) -> Self {
        self.max_bytes = self.max_bytes.max(MIN_BYTES);
        self.max_json_bytes = self.max_json_bytes.max(MIN_BYTES);
        if self.separator.is_empty() {
            self.separator = DEFAULT_SEPARATOR.to_string();
        }
        self.ignore_globs.retain(|g| !g.is_empty());
        self
    }
}

/// A file or directory reference as discovered during flattening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub path: PathBuf,
    /// Size reported by stat, when known.
    pub size: Option<u64>,
}

/// A single file resolved and read, ready for formatting.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub relative_path: String,
    /// Lower-cased extension, empty when the file has none.
    pub extension: String,
    pub size: u64,
    /// `None` means binary or unreadable.
    pub text: Option<String>,
}

impl FileEntry {
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.relative_path.clone())
    }
}

/// The bundle text plus its counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleResult {
    pub text: String,
    pub accepted_count: usize,
    pub total_bytes: usize,
    pub skipped_binary: usize,
    pub skipped_excluded: usize,
    pub truncated: bool,
}

/// Every way a single invocation can end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleOutcome {
    Bundled(BundleResult),
    EmptySelection,
    EmptyAfterFilters(BundleResult),
    NothingProduced(BundleResult),
}
