//! # wordtools-core
//!
//! Word counting and daily writing history for markdown documents.
//!
//! Raw text flows one way:
//! - [`normalize`] strips front-matter, `%%comments%%` and link targets
//!   according to [`CountSettings`]
//! - [`counter`] turns countable text into [`Counts`]
//! - [`HistoryStore`] records per-file word counts per [`DayKey`] and
//!   derives the net words written each day
//! - [`CountingService`] wires the three together for event-driven callers
//!
//! ```rust
//! use wordtools_core::{normalize_and_count, CountSettings};
//!
//! let counts = normalize_and_count("Hello [[Some Page|world]]!", &CountSettings::default());
//! assert_eq!(counts.words, 2);
//! ```

pub mod counter;
pub mod day;
pub mod error;
pub mod frontmatter;
pub mod history;
pub mod markup;
pub mod normalize;
pub mod service;
pub mod settings;

pub use counter::{char_count, word_count, Counts};
pub use day::DayKey;
pub use error::{ConfigError, Result, WordToolsError};
pub use history::{
    display_total, HistoryStore, RecordOutcome, WordTracker, WordTrackerDay, WordTrackerHistory,
};
pub use normalize::{normalize, normalize_and_count};
pub use service::{CountingService, DocumentUpdate};
pub use settings::{CountSettings, WordToolsConfig};
