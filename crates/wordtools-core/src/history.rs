//! Day-partitioned writing history.
//!
//! Core invariant: **a day with per-file records derives its total; a day
//! without them owns a frozen total.**
//!
//! The persisted shape is the history map itself:
//! ```json
//! {
//!   "2025/3/1": { "total": 36 },
//!   "2025/3/2": {
//!     "total": 7,
//!     "files": {
//!       "drafts/Chapter 1.md": { "initialCount": 18, "currentCount": 25 }
//!     },
//!     "goal": 500
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::day::DayKey;

/// One file's word count at its first sighting today and most recently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordTracker {
    pub initial_count: u64,
    pub current_count: u64,
}

impl WordTracker {
    #[must_use]
    pub fn new(count: u64) -> Self {
        Self {
            initial_count: count,
            current_count: count,
        }
    }

    /// Net words written since the first sighting. Negative after deletions.
    #[must_use]
    pub fn delta(&self) -> i64 {
        self.current_count as i64 - self.initial_count as i64
    }
}

/// All tracking for one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordTrackerDay {
    /// Derived while `files` is present, authoritative once pruned.
    pub total: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<BTreeMap<String, WordTracker>>,
    /// Goal in effect when the day was created. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<u64>,
}

impl WordTrackerDay {
    fn live(goal: Option<u64>) -> Self {
        Self {
            total: 0,
            files: Some(BTreeMap::new()),
            goal,
        }
    }

    /// `true` once per-file records have been discarded.
    #[must_use]
    pub fn is_pruned(&self) -> bool {
        self.files.is_none()
    }

    /// Sum of per-file deltas; zero for a pruned day.
    #[must_use]
    pub fn derived_total(&self) -> i64 {
        self.files
            .as_ref()
            .map_or(0, |files| files.values().map(WordTracker::delta).sum())
    }

    /// Freeze the total and drop per-file records. No-op if already pruned.
    pub fn prune(&mut self) {
        if self.files.is_some() {
            self.total = self.derived_total();
            self.files = None;
        }
    }
}

/// The entire durable state: day key to day record.
pub type WordTrackerHistory = BTreeMap<DayKey, WordTrackerDay>;

/// What [`HistoryStore::record_file_count`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// First sighting of the file that day; a tracker was seeded.
    Created,
    /// The existing tracker's current count was replaced.
    Updated,
    /// The day is pruned; nothing changed.
    Frozen,
}

/// Owner of the history ledger. All mutation goes through here.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    history: WordTrackerHistory,
    goal: Option<u64>,
}

impl HistoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a previously persisted history.
    #[must_use]
    pub fn from_history(history: WordTrackerHistory) -> Self {
        Self {
            history,
            goal: None,
        }
    }

    /// Goal stamped onto days created from now on.
    #[must_use]
    pub fn with_goal(mut self, goal: u64) -> Self {
        self.goal = Some(goal);
        self
    }

    pub fn set_goal(&mut self, goal: Option<u64>) {
        self.goal = goal;
    }

    /// Create the record for `day` if absent. Creating a day prunes every
    /// other day; an existing day is returned untouched.
    pub fn ensure_day(&mut self, day: &DayKey) -> &mut WordTrackerDay {
        if !self.history.contains_key(day) {
            debug!(day = %day, goal = ?self.goal, "starting new history day");
            self.history
                .insert(day.clone(), WordTrackerDay::live(self.goal));
            self.prune_except(day);
        }
        self.history
            .entry(day.clone())
            .or_insert_with(|| WordTrackerDay::live(None))
    }

    /// Record the latest word count of `path` on `day`.
    ///
    /// The first sighting seeds both counts; later sightings only move
    /// `current_count`. A pruned day is never revived.
    pub fn record_file_count(&mut self, day: &DayKey, path: &str, words: u64) -> RecordOutcome {
        let record = self.ensure_day(day);
        let Some(files) = record.files.as_mut() else {
            debug!(day = %day, path, "ignoring count for pruned day");
            return RecordOutcome::Frozen;
        };

        let outcome = match files.get_mut(path) {
            Some(tracker) => {
                tracker.current_count = words;
                RecordOutcome::Updated
            }
            None => {
                files.insert(path.to_string(), WordTracker::new(words));
                RecordOutcome::Created
            }
        };
        record.total = record.derived_total();
        outcome
    }

    /// Move the tracker for `old_path` to `new_path`, counts intact. A
    /// tracker already at `new_path` is replaced.
    ///
    /// Returns `false` (and changes nothing) when `old_path` has no tracker
    /// on `day`.
    pub fn rename_file(&mut self, day: &DayKey, old_path: &str, new_path: &str) -> bool {
        let Some(record) = self.history.get_mut(day) else {
            return false;
        };
        let Some(files) = record.files.as_mut() else {
            return false;
        };
        let Some(tracker) = files.remove(old_path) else {
            return false;
        };

        debug!(day = %day, from = old_path, to = new_path, "moving tracker to renamed file");
        if files.insert(new_path.to_string(), tracker).is_some() {
            debug!(day = %day, path = new_path, "renamed file replaced an existing tracker");
        }
        record.total = record.derived_total();
        true
    }

    /// Net words written on `day`, from per-file records. Zero for a missing
    /// or pruned day.
    #[must_use]
    pub fn daily_total(&self, day: &DayKey) -> i64 {
        self.history
            .get(day)
            .map_or(0, WordTrackerDay::derived_total)
    }

    /// Total for any day: frozen if pruned, derived otherwise.
    #[must_use]
    pub fn historical_total(&self, day: &DayKey) -> i64 {
        match self.history.get(day) {
            Some(record) if record.is_pruned() => record.total,
            Some(record) => record.derived_total(),
            None => 0,
        }
    }

    /// Whether `path` already has a tracker on `day`.
    #[must_use]
    pub fn is_tracked(&self, day: &DayKey, path: &str) -> bool {
        self.history
            .get(day)
            .and_then(|record| record.files.as_ref())
            .is_some_and(|files| files.contains_key(path))
    }

    /// Prune every day except `keep`. Returns how many days were pruned.
    pub fn prune_except(&mut self, keep: &DayKey) -> usize {
        let mut pruned = 0;
        for (day, record) in self.history.iter_mut() {
            if day != keep && !record.is_pruned() {
                record.prune();
                debug!(day = %day, total = record.total, "pruned history day");
                pruned += 1;
            }
        }
        pruned
    }

    #[must_use]
    pub fn day(&self, day: &DayKey) -> Option<&WordTrackerDay> {
        self.history.get(day)
    }

    /// Days in calendar order. Keys that do not parse as dates come last.
    #[must_use]
    pub fn days_chronological(&self) -> Vec<(&DayKey, &WordTrackerDay)> {
        let mut days: Vec<_> = self.history.iter().collect();
        days.sort_by_key(|(key, _)| (key.to_date().is_none(), key.to_date()));
        days
    }

    #[must_use]
    pub fn history(&self) -> &WordTrackerHistory {
        &self.history
    }

    #[must_use]
    pub fn into_history(self) -> WordTrackerHistory {
        self.history
    }
}

/// A signed total as shown to a user: never below zero.
#[must_use]
pub fn display_total(total: i64) -> u64 {
    total.max(0) as u64
}
