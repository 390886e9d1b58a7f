//! Counting service: normalizer, counter, and history behind one API.
//!
//! Callers react to editor or file-system events and hand over raw text.
//! The service is single-threaded; callers that receive events
//! concurrently must apply them in arrival order.

use serde::Serialize;

use crate::counter::Counts;
use crate::day::DayKey;
use crate::history::{display_total, HistoryStore, RecordOutcome};
use crate::normalize::normalize_and_count;
use crate::settings::{CountSettings, WordToolsConfig};

/// Result of a document change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentUpdate {
    pub counts: Counts,
    /// Net words written across all files on the day, unclamped.
    pub daily_total: i64,
    #[serde(skip)]
    pub outcome: RecordOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct CountingService {
    settings: CountSettings,
    store: HistoryStore,
}

impl CountingService {
    #[must_use]
    pub fn new(settings: CountSettings, store: HistoryStore) -> Self {
        Self { settings, store }
    }

    /// Build from user config; the store picks up the configured goal.
    #[must_use]
    pub fn from_config(config: &WordToolsConfig, store: HistoryStore) -> Self {
        Self::new(config.count_settings, store.with_goal(config.daily_word_goal))
    }

    #[must_use]
    pub fn normalize_and_count(&self, raw: &str) -> Counts {
        normalize_and_count(raw, &self.settings)
    }

    /// A document's content changed (edited, previewed, saved).
    pub fn document_changed(&mut self, day: &DayKey, path: &str, raw: &str) -> DocumentUpdate {
        let counts = self.normalize_and_count(raw);
        let outcome = self.store.record_file_count(day, path, counts.words);
        DocumentUpdate {
            counts,
            daily_total: self.store.daily_total(day),
            outcome,
        }
    }

    /// A document was opened. Seeds today's tracker without moving the
    /// current count of a file that is already tracked.
    pub fn document_opened(&mut self, day: &DayKey, path: &str, raw: &str) -> Counts {
        let counts = self.normalize_and_count(raw);
        if !self.store.is_tracked(day, path) {
            self.store.record_file_count(day, path, counts.words);
        }
        counts
    }

    pub fn document_renamed(&mut self, day: &DayKey, old_path: &str, new_path: &str) -> bool {
        self.store.rename_file(day, old_path, new_path)
    }

    #[must_use]
    pub fn daily_total(&self, day: &DayKey) -> i64 {
        self.store.daily_total(day)
    }

    /// Today's total as shown to a user, clamped at zero.
    #[must_use]
    pub fn display_daily_total(&self, day: &DayKey) -> u64 {
        display_total(self.store.daily_total(day))
    }

    #[must_use]
    pub fn settings(&self) -> &CountSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: CountSettings) {
        self.settings = settings;
    }

    #[must_use]
    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut HistoryStore {
        &mut self.store
    }

    #[must_use]
    pub fn into_store(self) -> HistoryStore {
        self.store
    }
}
