//! Per-file count cache for vault-wide totals.
//!
//! An entry is trusted while the file's modification time is not newer
//! than the cached stamp. A newer stamp forces a re-read; if the content
//! hash is unchanged the old counts are kept without re-counting.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use sha2::{Digest, Sha256};
use wordtools_core::{normalize_and_count, CountSettings, Counts};

/// What the cache knows about one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedCount {
    pub modified: SystemTime,
    pub content_hash: [u8; 32],
    pub counts: Counts,
}

#[derive(Debug, Clone, Default)]
pub struct CountCache {
    settings: CountSettings,
    entries: HashMap<PathBuf, CachedCount>,
}

impl CountCache {
    #[must_use]
    pub fn new(settings: CountSettings) -> Self {
        Self {
            settings,
            entries: HashMap::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &CountSettings {
        &self.settings
    }

    /// Switch counting policy. Cached counts were made under the old
    /// policy, so a change empties the cache.
    pub fn set_settings(&mut self, settings: CountSettings) {
        if settings != self.settings {
            self.entries.clear();
            self.settings = settings;
        }
    }

    /// Counts for `path`, re-reading through `read` only when `modified`
    /// is newer than the cached stamp.
    ///
    /// # Errors
    ///
    /// Propagates the error from `read`; the cache is left unchanged.
    pub fn counts_for<F>(&mut self, path: &Path, modified: SystemTime, read: F) -> io::Result<Counts>
    where
        F: FnOnce() -> io::Result<String>,
    {
        let cached = self.entries.get(path).copied();
        if let Some(entry) = cached {
            if modified <= entry.modified {
                return Ok(entry.counts);
            }
        }

        let content = read()?;
        let content_hash = hash_content(&content);
        let counts = match cached {
            Some(entry) if entry.content_hash == content_hash => entry.counts,
            _ => normalize_and_count(&content, &self.settings),
        };

        self.entries.insert(
            path.to_path_buf(),
            CachedCount {
                modified,
                content_hash,
                counts,
            },
        );
        Ok(counts)
    }

    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&CachedCount> {
        self.entries.get(path)
    }

    /// Forget one file, e.g. after it was deleted.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Drop every entry not in `live`. Returns the number evicted.
    pub fn retain_paths(&mut self, live: &HashSet<PathBuf>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|path, _| live.contains(path));
        before - self.entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn hash_content(content: &str) -> [u8; 32] {
    let digest = Sha256::digest(content.as_bytes());
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&digest);
    hash
}
