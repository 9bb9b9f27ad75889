use crate::app::formatter::OutputGenerator;
use crate::app::models::{BundleOutcome, BundleResult, FileEntry, RuntimeConfig};

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdown", "mkd", "mkdn", "mdx"];

pub fn is_markdown(extension: &str) -> bool {
    MARKDOWN_EXTENSIONS.contains(&extension)
}

/// Appends formatted blocks in path order until the byte budget is reached.
///
/// Each block is charged with its encoded length plus one separator. When the
/// first candidate already overflows, a single truncated copy of it is emitted
/// instead so the bundle is never empty just because one file is large.
pub fn accumulate(entries: &[FileEntry], config: &RuntimeConfig) -> BundleResult {
    let mut sorted: Vec<&FileEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.path.as_os_str().cmp(b.path.as_os_str()));

    let mut result = BundleResult::default();
    let mut chunks: Vec<String> = Vec::new();
    let mut total = 0usize;

    for entry in sorted {
        let Some(text) = entry.text.as_deref() else {
            log::debug!("Skipping binary or unreadable {}", entry.relative_path);
            result.skipped_binary += 1;
            continue;
        };

        if config.exclude_markdown && is_markdown(&entry.extension) {
            log::debug!("Skipping markdown {}", entry.relative_path);
            result.skipped_excluded += 1;
            continue;
        }

        let formatted = OutputGenerator::format_block(entry, text, config);
        let next_size = formatted.block.len() + config.separator.len();
        log::trace!(
            "{}: lang '{}', {} metadata bytes, {} block bytes",
            entry.relative_path,
            formatted.fence_lang,
            formatted.meta.len(),
            next_size
        );

        if total + next_size > config.max_bytes {
            if chunks.is_empty() {
                if let Some(partial) = formatted.truncated_to(config.max_bytes) {
                    log::debug!(
                        "Truncating {} to fit {} bytes",
                        entry.relative_path,
                        config.max_bytes
                    );
                    chunks.push(partial);
                    total = config.max_bytes;
                }
            }
            result.truncated = true;
            break;
        }

        chunks.push(formatted.block);
        total += next_size;
    }

    result.accepted_count = chunks.len();
    result.total_bytes = total;
    result.text = chunks.join(config.separator.as_str());
    result
}

/// Classifies a finished accumulation into the outcome reported to the user.
pub fn into_outcome(result: BundleResult) -> BundleOutcome {
    if !result.text.is_empty() {
        BundleOutcome::Bundled(result)
    } else if result.truncated {
        BundleOutcome::NothingProduced(result)
    } else {
        BundleOutcome::EmptyAfterFilters(result)
    }
}
