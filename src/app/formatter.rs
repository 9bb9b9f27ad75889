use crate::app::language::fence_lang;
use crate::app::models::{FileEntry, RuntimeConfig};

pub const FENCE_CLOSE: &str = "\n```";
pub const JSON_TRUNCATION_MARKER: &str = "\n/* ...JSON truncated... */";
pub const BUDGET_TRUNCATION_MARKER: &str = "\n/* ...truncated... */";

/// Bytes held back from the JSON cap for the truncation marker.
const JSON_MARKER_RESERVE: usize = 64;

/// One file rendered as a fenced block, with its parts kept for re-truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedBlock {
    pub fence_lang: String,
    pub meta: String,
    /// Everything before the body: metadata and the opening fence in configured order.
    pub prefix: String,
    pub body: String,
    pub block: String,
}

impl FormattedBlock {
    /// Rebuilds the block with the body cut so the whole thing fits in `max_bytes`.
    ///
    /// Returns `None` when not even the fences and marker fit.
    pub fn truncated_to(&self, max_bytes: usize) -> Option<String> {
        let overhead = self.prefix.len() + BUDGET_TRUNCATION_MARKER.len() + FENCE_CLOSE.len();
        let available = max_bytes.checked_sub(overhead).filter(|&n| n > 0)?;
        let body = truncate_to_char_boundary(&self.body, available);
        Some(format!(
            "{}{}{}{}",
            self.prefix, body, BUDGET_TRUNCATION_MARKER, FENCE_CLOSE
        ))
    }
}

pub struct OutputGenerator;

impl OutputGenerator {
    /// Renders a text entry as a block. Pure: no I/O happens here.
    pub fn format_block(entry: &FileEntry, text: &str, config: &RuntimeConfig) -> FormattedBlock {
        let body = if entry.extension == "json" {
            Self::cap_json(text, config.max_json_bytes)
        } else {
            text.to_string()
        };

        let fence_lang = fence_lang(&entry.extension);
        let meta = Self::metadata(entry);
        let open = Self::fence_open(&fence_lang);

        let prefix = match (config.include_headers, config.metadata_inside_fence) {
            (false, _) => open,
            (true, false) => format!("{}{}", meta, open),
            (true, true) => format!("{}{}", open, meta),
        };
        let block = format!("{}{}{}", prefix, body, FENCE_CLOSE);

        FormattedBlock {
            fence_lang,
            meta,
            prefix,
            body,
            block,
        }
    }

    pub fn metadata(entry: &FileEntry) -> String {
        format!(
            "Name: {}\nSize: {} bytes\nRelative path: {}\n",
            entry.display_name(),
            entry.size,
            entry.relative_path
        )
    }

    fn fence_open(lang: &str) -> String {
        if lang.is_empty() {
            "```\n".to_string()
        } else {
            format!("```{}\n", lang)
        }
    }

    fn cap_json(text: &str, max_json_bytes: usize) -> String {
        if text.len() <= max_json_bytes {
            return text.to_string();
        }
        let keep = max_json_bytes.saturating_sub(JSON_MARKER_RESERVE);
        let mut out = truncate_to_char_boundary(text, keep).to_string();
        out.push_str(JSON_TRUNCATION_MARKER);
        out
    }
}

/// Longest prefix of `s` that is at most `max` bytes and ends on a char boundary.
pub fn truncate_to_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
