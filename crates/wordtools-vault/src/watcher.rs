//! File system watcher for vault documents.
//!
//! Raw `notify` events are narrowed to the markdown documents a [`Vault`]
//! tracks and delivered over a channel, so the caller decides how long
//! to block.

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::Result;
use crate::scan::Vault;

/// A change to a tracked document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEvent {
    /// Created or written.
    Changed(PathBuf),
    /// Deleted, or moved out of the vault.
    Removed(PathBuf),
    /// A markdown file was renamed within the vault.
    Renamed { from: PathBuf, to: PathBuf },
}

/// Watches a vault directory for document changes.
pub struct VaultWatcher {
    _watcher: RecommendedWatcher,
    receiver: mpsc::Receiver<VaultEvent>,
}

impl VaultWatcher {
    /// Start watching `vault` recursively.
    ///
    /// # Errors
    ///
    /// Returns [`crate::VaultError::Watch`] if the watcher cannot be created.
    pub fn start(vault: &Vault) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let filter = vault.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else {
                return;
            };
            for vault_event in translate(&filter, &event) {
                let _ = tx.send(vault_event);
            }
        })?;

        watcher.watch(vault.root(), RecursiveMode::Recursive)?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
        })
    }

    /// Wait up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<VaultEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Next event if one is already queued.
    pub fn try_recv(&self) -> Option<VaultEvent> {
        self.receiver.try_recv().ok()
    }
}

/// Map a raw notify event onto vault events, dropping paths the vault
/// does not track.
fn translate(vault: &Vault, event: &Event) -> Vec<VaultEvent> {
    if let EventKind::Modify(ModifyKind::Name(RenameMode::Both)) = event.kind {
        if let [from, to] = event.paths.as_slice() {
            return match (vault.contains(from), vault.contains(to)) {
                (true, true) => vec![VaultEvent::Renamed {
                    from: from.clone(),
                    to: to.clone(),
                }],
                (true, false) => vec![VaultEvent::Removed(from.clone())],
                (false, true) => vec![VaultEvent::Changed(to.clone())],
                (false, false) => Vec::new(),
            };
        }
    }

    event
        .paths
        .iter()
        .filter(|path| vault.contains(path))
        .filter_map(|path| match event.kind {
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) | EventKind::Remove(_) => {
                Some(VaultEvent::Removed(path.clone()))
            }
            EventKind::Create(_) | EventKind::Modify(_) => Some(VaultEvent::Changed(path.clone())),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, RemoveKind};
    use std::fs;

    fn event(kind: EventKind, paths: &[PathBuf]) -> Event {
        let mut event = Event::new(kind);
        for path in paths {
            event = event.add_path(path.clone());
        }
        event
    }

    #[test]
    fn translate_maps_event_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::open(dir.path()).unwrap();
        let a = vault.root().join("a.md");

        assert_eq!(
            translate(&vault, &event(EventKind::Create(CreateKind::File), &[a.clone()])),
            [VaultEvent::Changed(a.clone())]
        );
        assert_eq!(
            translate(
                &vault,
                &event(EventKind::Modify(ModifyKind::Data(DataChange::Content)), &[a.clone()])
            ),
            [VaultEvent::Changed(a.clone())]
        );
        assert_eq!(
            translate(&vault, &event(EventKind::Remove(RemoveKind::File), &[a.clone()])),
            [VaultEvent::Removed(a)]
        );
    }

    #[test]
    fn translate_pairs_renames() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::open(dir.path()).unwrap();
        let from = vault.root().join("old.md");
        let to = vault.root().join("new.md");
        let rename = EventKind::Modify(ModifyKind::Name(RenameMode::Both));

        assert_eq!(
            translate(&vault, &event(rename, &[from.clone(), to.clone()])),
            [VaultEvent::Renamed {
                from: from.clone(),
                to: to.clone()
            }]
        );

        let hidden = vault.root().join(".trash").join("old.md");
        assert_eq!(
            translate(&vault, &event(rename, &[from.clone(), hidden])),
            [VaultEvent::Removed(from)]
        );
    }

    #[test]
    fn translate_ignores_untracked_paths() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::open(dir.path()).unwrap();
        let txt = vault.root().join("notes.txt");
        let hidden = vault.root().join(".wordtools").join("history.md");

        let create = event(EventKind::Create(CreateKind::File), &[txt, hidden]);
        assert!(translate(&vault, &create).is_empty());
    }

    #[test]
    fn live_watcher_reports_new_document() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::open(dir.path()).unwrap();
        fs::create_dir_all(vault.root().join("drafts")).unwrap();
        let watcher = VaultWatcher::start(&vault).unwrap();

        let file = vault.root().join("drafts").join("chapter.md");
        fs::write(&file, "It was a dark and stormy night.").unwrap();

        match watcher.recv_timeout(Duration::from_secs(2)) {
            Some(VaultEvent::Changed(path)) => assert_eq!(path, file),
            other => panic!("no change event for new document: {other:?}"),
        }
    }

    #[test]
    fn live_watcher_skips_untracked_files() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::open(dir.path()).unwrap();
        fs::create_dir_all(vault.root().join(".wordtools")).unwrap();
        let watcher = VaultWatcher::start(&vault).unwrap();

        fs::write(vault.root().join("todo.txt"), "plain text").unwrap();
        fs::write(vault.root().join(".wordtools").join("history.json"), "{}").unwrap();

        assert_eq!(watcher.recv_timeout(Duration::from_millis(500)), None);
    }
}
