//! Vault walking and the vault-wide word count.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};
use wordtools_core::Counts;

use crate::cache::CountCache;
use crate::error::{Result, VaultError};

/// Totals over every markdown file in a vault.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VaultTotals {
    pub files: usize,
    #[serde(flatten)]
    pub counts: Counts,
}

/// A directory tree of markdown documents.
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    /// # Errors
    ///
    /// Returns [`VaultError::NotFound`] if `root` is not a directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(VaultError::NotFound(root));
        }
        // Watcher events carry resolved paths (e.g. /private/var on macOS).
        let root = root.canonicalize().map_err(|e| VaultError::io(&root, e))?;
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All `*.md` files, skipping hidden files and directories.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Walk`] if a directory cannot be listed.
    pub fn markdown_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
        {
            let entry = entry?;
            if entry.file_type().is_file() && is_markdown(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Whether `path` is a document this vault tracks.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        is_markdown(path)
            && path.strip_prefix(&self.root).is_ok_and(|rel| {
                !rel.components()
                    .any(|c| c.as_os_str().to_str().is_some_and(|s| s.starts_with('.')))
            })
    }

    /// Vault-relative path with `/` separators, used as the history key.
    #[must_use]
    pub fn relative_key(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Count every markdown file, reusing `cache` where files are unchanged.
    ///
    /// Unreadable files are logged and skipped. Cache entries for files
    /// that no longer exist are evicted.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Walk`] if the vault cannot be listed.
    pub fn scan(&self, cache: &mut CountCache) -> Result<VaultTotals> {
        let mut totals = VaultTotals::default();
        let mut seen = HashSet::new();

        for path in self.markdown_files()? {
            let modified = match fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping file without metadata");
                    continue;
                }
            };

            match cache.counts_for(&path, modified, || fs::read_to_string(&path)) {
                Ok(counts) => {
                    totals.files += 1;
                    totals.counts = totals.counts + counts;
                    seen.insert(path);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable file"),
            }
        }

        let evicted = cache.retain_paths(&seen);
        debug!(
            root = %self.root.display(),
            files = totals.files,
            words = totals.counts.words,
            evicted,
            "scanned vault"
        );
        Ok(totals)
    }
}

/// Read one document.
///
/// # Errors
///
/// Returns [`VaultError::Io`] naming the path.
pub fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| VaultError::io(path, e))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|s| s.starts_with('.'))
}

fn is_markdown(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}
