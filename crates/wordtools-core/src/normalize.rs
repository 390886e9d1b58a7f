//! Raw document text to countable text.
//!
//! Passes run in a fixed order: front-matter, comments, links. Comment
//! markers may sit inside link text and the other way round, so the order
//! is part of the result.

use std::borrow::Cow;

use crate::counter::Counts;
use crate::frontmatter::strip_frontmatter;
use crate::markup::{resolve_aliases, strip_comments};
use crate::settings::CountSettings;

/// Strip the markup that `settings` excludes from counting.
#[must_use]
pub fn normalize<'a>(text: &'a str, settings: &CountSettings) -> Cow<'a, str> {
    let mut countable = Cow::Borrowed(text);

    if settings.remove_frontmatter {
        countable = Cow::Borrowed(strip_frontmatter(text));
    }

    if !settings.count_comments {
        countable = map_cow(countable, strip_comments);
    }

    if !settings.count_full_link {
        countable = map_cow(countable, resolve_aliases);
    }

    countable
}

/// Normalize then count. This is the entry point for raw document or
/// selection text.
#[must_use]
pub fn normalize_and_count(text: &str, settings: &CountSettings) -> Counts {
    Counts::of(&normalize(text, settings))
}

/// Apply a borrowing pass without giving up an existing borrow of the input.
fn map_cow<'a>(text: Cow<'a, str>, pass: fn(&str) -> Cow<'_, str>) -> Cow<'a, str> {
    match text {
        Cow::Borrowed(s) => pass(s),
        Cow::Owned(s) => Cow::Owned(pass(&s).into_owned()),
    }
}
