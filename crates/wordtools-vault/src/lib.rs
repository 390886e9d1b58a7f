//! # wordtools-vault
//!
//! File system side of wordtools: everything that touches a vault on disk.
//!
//! - [`Vault`] walks markdown documents and computes vault-wide totals
//! - [`CountCache`] keeps per-file counts keyed by modification time
//! - [`HistoryFile`] loads and atomically saves the writing history
//! - [`VaultWatcher`] turns file system events into [`VaultEvent`]s
//! - [`Debouncer`] coalesces event bursts before refreshing or saving

pub mod cache;
pub mod debounce;
pub mod error;
pub mod scan;
pub mod store;
pub mod watcher;

pub use cache::{CachedCount, CountCache};
pub use debounce::Debouncer;
pub use error::{Result, VaultError};
pub use scan::{read_document, Vault, VaultTotals};
pub use store::{HistoryFile, HISTORY_FILENAME};
pub use watcher::{VaultEvent, VaultWatcher};
