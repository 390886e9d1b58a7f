//! Inline markup passes: `%%comment%%` removal and `[[target|alias]]`
//! link resolution.
//!
//! Both passes are total. Unmatched or malformed markers are kept as
//! literal text.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// `%%...%%` on a single line, shortest match first.
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%%.*?%%").expect("comment pattern is valid"));

const LINK_OPEN: &str = "[[";
const LINK_CLOSE: &str = "]]";
const ALIAS_SEPARATOR: char = '|';

/// Remove every `%%...%%` span. A lone `%%` stays in the text.
#[must_use]
pub fn strip_comments(text: &str) -> Cow<'_, str> {
    COMMENT_RE.replace_all(text, "")
}

/// Replace every aliased link `[[target|alias]]` with `alias`.
///
/// Links without an alias are untouched. Passes repeat until the text
/// stops changing, so the output never contains a resolvable aliased link.
#[must_use]
pub fn resolve_aliases(text: &str) -> Cow<'_, str> {
    if !text.contains(LINK_OPEN) {
        return Cow::Borrowed(text);
    }

    let mut current = text.to_string();
    loop {
        let next = resolve_aliases_once(&current);
        // Every replacement drops at least `[[|]]`, so this terminates.
        if next.len() == current.len() {
            break;
        }
        current = next;
    }

    if current == text {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(current)
    }
}

/// One left-to-right scan. Open brackets are tracked on a stack so that
/// nested links resolve innermost first; a newline discards any links
/// still open on that line.
fn resolve_aliases_once(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut opens: Vec<usize> = Vec::new();
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix(LINK_OPEN) {
            opens.push(out.len());
            out.push_str(LINK_OPEN);
            rest = after;
            continue;
        }

        if let Some(after) = rest.strip_prefix(LINK_CLOSE) {
            match opens.pop() {
                Some(start) => {
                    let inner = &out[start + LINK_OPEN.len()..];
                    match inner.split_once(ALIAS_SEPARATOR) {
                        Some((_, alias)) => {
                            let alias = alias.to_string();
                            out.truncate(start);
                            out.push_str(&alias);
                        }
                        None => out.push_str(LINK_CLOSE),
                    }
                }
                None => out.push_str(LINK_CLOSE),
            }
            rest = after;
            continue;
        }

        if ch == '\n' {
            opens.clear();
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    out
}
