//! Day keys: the partition key of the writing history.
//!
//! A key is the calendar date as `YYYY/M/D` without zero padding
//! (`2025/3/1`). Keys compare equal as strings, but string order is not
//! date order (`2025/10/1` sorts before `2025/9/1`), so anything that
//! needs chronology goes through [`DayKey::to_date`].
//!
//! [`DayKey::today`] uses the UTC calendar date. Callers that want local
//! day boundaries build keys with [`DayKey::from_date`].

use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WordToolsError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(String);

impl DayKey {
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(format!("{}/{}/{}", date.year(), date.month(), date.day()))
    }

    /// Today's key, by UTC calendar date.
    #[must_use]
    pub fn today() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    /// Parse and canonicalize a `YYYY/M/D` key. Zero-padded input is
    /// accepted and normalized (`2025/03/01` becomes `2025/3/1`).
    ///
    /// # Errors
    ///
    /// Returns [`WordToolsError::DayKey`] if `key` is not a valid date.
    pub fn parse(key: &str) -> Result<Self, WordToolsError> {
        NaiveDate::parse_from_str(key, "%Y/%m/%d")
            .map(Self::from_date)
            .map_err(|_| WordToolsError::DayKey {
                key: key.to_string(),
            })
    }

    /// The calendar date for this key, or `None` for a key that was
    /// deserialized from a malformed history.
    #[must_use]
    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, "%Y/%m/%d").ok()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl std::str::FromStr for DayKey {
    type Err = WordToolsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for DayKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for DayKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}
