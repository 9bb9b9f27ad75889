use crate::app::error::ScanError;
use crate::app::fs::{relative_path, FileKind, FileSystem};
use crate::app::models::{FileEntry, FileRef, RuntimeConfig};
use crate::app::sniffer::is_binary;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub struct Scanner<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    root: PathBuf,
    ignore_set: Option<GlobSet>,
}

impl<'a, F: FileSystem + ?Sized> Scanner<'a, F> {
    pub fn new(fs: &'a F, root: PathBuf, config: &RuntimeConfig) -> Result<Self, ScanError> {
        Ok(Self {
            fs,
            root,
            ignore_set: build_globset(&config.ignore_globs)?,
        })
    }

    /// Expands the selection into every file below it, in discovery order.
    ///
    /// Any stat or listing failure aborts the whole selection.
    pub fn flatten(&self, selection: &[PathBuf]) -> Result<Vec<FileRef>, ScanError> {
        let mut out = Vec::new();
        let mut seen_files = HashSet::new();
        let mut seen_dirs = HashSet::new();
        for path in selection {
            self.visit(path, &mut out, &mut seen_files, &mut seen_dirs)?;
        }
        Ok(out)
    }

    fn visit(
        &self,
        path: &Path,
        out: &mut Vec<FileRef>,
        seen_files: &mut HashSet<PathBuf>,
        seen_dirs: &mut HashSet<PathBuf>,
    ) -> Result<(), ScanError> {
        let stat = self.fs.stat(path).map_err(|source| ScanError::Stat {
            path: path.to_path_buf(),
            source,
        })?;

        match stat.kind {
            FileKind::File => {
                if seen_files.insert(path.to_path_buf()) {
                    out.push(FileRef {
                        path: path.to_path_buf(),
                        size: Some(stat.size),
                    });
                }
            }
            FileKind::Directory => {
                let identity = self
                    .fs
                    .canonicalize(path)
                    .unwrap_or_else(|_| path.to_path_buf());
                if !seen_dirs.insert(identity) {
                    log::debug!("Skipping already visited directory {}", path.display());
                    return Ok(());
                }

                let children = self.fs.list_dir(path).map_err(|source| ScanError::ListDir {
                    path: path.to_path_buf(),
                    source,
                })?;
                for child in children {
                    self.visit(&child, out, seen_files, seen_dirs)?;
                }
            }
            FileKind::Other => {
                log::debug!("Skipping non-regular path {}", path.display());
            }
        }
        Ok(())
    }

    /// Drops every file whose absolute or root-relative path matches an ignore glob.
    pub fn filter(&self, refs: Vec<FileRef>) -> Vec<FileRef> {
        let Some(set) = &self.ignore_set else {
            return refs;
        };

        refs.into_iter()
            .filter(|file| {
                let absolute = file.path.to_string_lossy().replace('\\', "/");
                let relative = relative_path(&file.path, &self.root);
                let ignored = set.is_match(&absolute) || set.is_match(&relative);
                if ignored {
                    log::debug!("Ignoring {}", relative);
                }
                !ignored
            })
            .collect()
    }

    /// Reads one file. Read failures and binary content both yield `text: None`.
    pub fn load(&self, file: &FileRef) -> FileEntry {
        let (text, content_len) = match self.fs.read(&file.path) {
            Ok(bytes) if is_binary(&bytes) => (None, bytes.len()),
            Ok(bytes) => (Some(decode_text(&bytes)), bytes.len()),
            Err(e) => {
                log::debug!("Failed to read {}: {}", file.path.display(), e);
                (None, 0)
            }
        };

        FileEntry {
            path: file.path.clone(),
            relative_path: relative_path(&file.path, &self.root),
            extension: extension_of(&file.path),
            size: file.size.unwrap_or(content_len as u64),
            text,
        }
    }
}

/// Lossy UTF-8 decode that drops a leading byte-order mark.
fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Lower-cased text after the last dot of the file name.
///
/// Dotfiles count too: `.env` has the extension `env`.
pub fn extension_of(path: &Path) -> String {
    let Some(name) = path.file_name() else {
        return String::new();
    };
    name.to_string_lossy()
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Case-insensitive globs where `*` stops at `/` and dotfiles are matchable.
fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, ScanError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(pat)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .map_err(|source| ScanError::InvalidGlob {
                pattern: pat.clone(),
                source,
            })?;
        builder.add(glob);
    }
    let set = builder.build().map_err(|source| ScanError::InvalidGlob {
        pattern: patterns.join(", "),
        source,
    })?;
    Ok(Some(set))
}
