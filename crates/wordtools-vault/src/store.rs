//! History persistence as a JSON document.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;
use wordtools_core::WordTrackerHistory;

use crate::error::{Result, VaultError};

/// Default history file name inside a vault's settings directory.
pub const HISTORY_FILENAME: &str = "history.json";

/// The on-disk home of a [`WordTrackerHistory`].
#[derive(Debug, Clone)]
pub struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<vault>/.wordtools/history.json`
    #[must_use]
    pub fn in_vault(root: &Path) -> Self {
        Self::new(root.join(".wordtools").join(HISTORY_FILENAME))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the history. A missing file is an empty history.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Io`] if the file cannot be read, or
    /// [`VaultError::History`] if it is not a valid history document.
    pub fn load(&self) -> Result<WordTrackerHistory> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no history file yet");
                return Ok(WordTrackerHistory::new());
            }
            Err(e) => return Err(VaultError::io(&self.path, e)),
        };

        serde_json::from_str(&text).map_err(|source| VaultError::History {
            path: self.path.clone(),
            source,
        })
    }

    /// Write the history atomically: a temp file in the same directory is
    /// renamed over the target.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Io`] if the directory or file cannot be written.
    pub fn save(&self, history: &WordTrackerHistory) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| VaultError::io(dir, e))?;

        let json = serde_json::to_string_pretty(history).map_err(|source| VaultError::History {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| VaultError::io(dir, e))?;
        write_synced(&mut tmp, json.as_bytes()).map_err(|e| VaultError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| VaultError::io(&self.path, e.error))?;

        debug!(path = %self.path.display(), days = history.len(), "saved history");
        Ok(())
    }
}

fn write_synced(tmp: &mut NamedTempFile, json: &[u8]) -> std::io::Result<()> {
    tmp.write_all(json)?;
    tmp.write_all(b"\n")?;
    tmp.as_file_mut().sync_all()
}
