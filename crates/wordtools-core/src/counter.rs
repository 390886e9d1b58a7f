//! Word and character counting over countable text.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A comma-grouped number (`1,000,000`), or a word with at most one
/// internal apostrophe (`don't`, `l’eau`).
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:,\d+)+|\w+(?:['’]\w+)?").expect("word pattern is valid")
});

/// Word and character totals for one piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Counts {
    pub words: u64,
    pub chars: u64,
}

impl Counts {
    /// Count `text` as-is. The text should already be normalized.
    #[must_use]
    pub fn of(text: &str) -> Self {
        Self {
            words: word_count(text),
            chars: char_count(text),
        }
    }
}

impl std::ops::Add for Counts {
    type Output = Counts;

    fn add(self, rhs: Counts) -> Counts {
        Counts {
            words: self.words + rhs.words,
            chars: self.chars + rhs.chars,
        }
    }
}

impl std::iter::Sum for Counts {
    fn sum<I: Iterator<Item = Counts>>(iter: I) -> Counts {
        iter.fold(Counts::default(), |acc, c| acc + c)
    }
}

/// Number of words in `text`.
///
/// Underscores separate words. A token that starts right after a `-` is
/// not a word of its own: `-5` and `-flag` count nothing, `well-known`
/// counts once.
#[must_use]
pub fn word_count(text: &str) -> u64 {
    let text = text.replace('_', " ");
    WORD_RE
        .find_iter(&text)
        .filter(|m| !text[..m.start()].ends_with('-'))
        .count() as u64
}

/// Number of Unicode scalar values in `text`.
#[must_use]
pub fn char_count(text: &str) -> u64 {
    text.chars().count() as u64
}
