use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    Other,
}

#[derive(Debug, Clone, Copy)]
pub struct FileStat {
    pub kind: FileKind,
    pub size: u64,
}

/// File-system access the bundling core needs from its host.
pub trait FileSystem {
    fn stat(&self, path: &Path) -> io::Result<FileStat>;

    /// Immediate children, in the order the host lists them.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Identity used to detect directories reached twice (symlink loops).
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        Ok(path.to_path_buf())
    }
}

pub struct LocalFs;

impl FileSystem for LocalFs {
    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let meta = fs::metadata(path)?;
        let kind = if meta.is_file() {
            FileKind::File
        } else if meta.is_dir() {
            FileKind::Directory
        } else {
            FileKind::Other
        };
        Ok(FileStat {
            kind,
            size: meta.len(),
        })
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }
}

/// Path of `path` relative to `root`, forward-slash normalized.
///
/// Paths that do not live under `root` are returned in full.
pub fn relative_path(path: &Path, root: &Path) -> String {
    let relative = match pathdiff::diff_paths(path, root) {
        Some(rel) if !rel.starts_with("..") && !rel.as_os_str().is_empty() => rel,
        _ => path.to_path_buf(),
    };
    relative.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;

    /// In-memory tree for exercising the core without touching disk.
    #[derive(Default)]
    pub struct MemoryFs {
        files: BTreeMap<PathBuf, Vec<u8>>,
        dirs: BTreeMap<PathBuf, Vec<PathBuf>>,
        unreadable: Vec<PathBuf>,
        /// Directory aliases, resolved by `canonicalize`.
        links: BTreeMap<PathBuf, PathBuf>,
    }

    impl MemoryFs {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
            let path = PathBuf::from(path);
            self.attach(&path);
            self.files.insert(path, content.into());
            self
        }

        pub fn unreadable(mut self, path: &str) -> Self {
            self = self.file(path, Vec::new());
            self.unreadable.push(PathBuf::from(path));
            self
        }

        /// Adds `path` as a child of `parent` that resolves back to `target`.
        pub fn dir_link(mut self, path: &str, target: &str) -> Self {
            let path = PathBuf::from(path);
            let target = PathBuf::from(target);
            self.attach(&path);
            let children = self.dirs.get(&target).cloned().unwrap_or_default();
            let aliased = children
                .iter()
                .filter_map(|c| c.file_name().map(|n| path.join(n)))
                .collect();
            self.dirs.insert(path.clone(), aliased);
            self.links.insert(path, target);
            self
        }

        fn ensure_dir(&mut self, path: &Path) {
            if self.dirs.contains_key(path) {
                return;
            }
            self.attach(path);
            self.dirs.insert(path.to_path_buf(), Vec::new());
        }

        fn attach(&mut self, path: &Path) {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                self.ensure_dir(parent);
                let children = self.dirs.entry(parent.to_path_buf()).or_default();
                if !children.iter().any(|c| c == path) {
                    children.push(path.to_path_buf());
                }
            }
        }

        fn not_found(path: &Path) -> io::Error {
            io::Error::new(io::ErrorKind::NotFound, path.display().to_string())
        }
    }

    impl FileSystem for MemoryFs {
        fn stat(&self, path: &Path) -> io::Result<FileStat> {
            if let Some(bytes) = self.files.get(path) {
                Ok(FileStat {
                    kind: FileKind::File,
                    size: bytes.len() as u64,
                })
            } else if self.dirs.contains_key(path) {
                Ok(FileStat {
                    kind: FileKind::Directory,
                    size: 0,
                })
            } else {
                Err(Self::not_found(path))
            }
        }

        fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
            self.dirs
                .get(path)
                .cloned()
                .ok_or_else(|| Self::not_found(path))
        }

        fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            if self.unreadable.iter().any(|p| p == path) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| Self::not_found(path))
        }

        fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
            Ok(self
                .links
                .get(path)
                .cloned()
                .unwrap_or_else(|| path.to_path_buf()))
        }
    }
}
